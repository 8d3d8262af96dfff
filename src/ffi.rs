//! FFI bindings for Interview Fusion
//!
//! This module provides C-compatible functions for calling the engine from other languages.
//! All functions use C strings (null-terminated) and return allocated memory that
//! must be freed by the caller using `fusion_free_string`.

use std::cell::RefCell;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::ptr;

use crate::config::EngineConfig;
use crate::error::EvaluationError;
use crate::pipeline::{evaluate_json, evaluate_json_with_config};

// Thread-local storage for the last error message
thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

fn set_last_error(msg: &str) {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

fn clear_last_error() {
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = None;
    });
}

/// Helper to convert C string to Rust string
unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok().map(|s| s.to_string())
}

/// Convert an evaluation outcome into a caller-owned C string, or NULL with
/// the last error set
fn outcome_to_cstr(outcome: Result<String, EvaluationError>) -> *mut c_char {
    let json = match outcome {
        Ok(json) => json,
        Err(e) => {
            set_last_error(&e.to_string());
            return ptr::null_mut();
        }
    };
    match CString::new(json) {
        Ok(cstr) => cstr.into_raw(),
        Err(e) => {
            set_last_error(&EvaluationError::EncodingError(e.to_string()).to_string());
            ptr::null_mut()
        }
    }
}

// ============================================================================
// Stateless API
// ============================================================================

/// Evaluate a request JSON with the default configuration and return the
/// report envelope JSON.
///
/// # Safety
/// - `request_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `fusion_free_string`.
/// - Returns NULL on error; call `fusion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn fusion_evaluate_json(request_json: *const c_char) -> *mut c_char {
    clear_last_error();

    let request = match cstr_to_string(request_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid request string pointer");
            return ptr::null_mut();
        }
    };

    outcome_to_cstr(evaluate_json(&request))
}

// ============================================================================
// Configured API
// ============================================================================

/// Opaque handle holding a validated engine configuration
pub struct FusionEvaluatorHandle {
    config: EngineConfig,
}

/// Create an evaluator handle from a configuration JSON.
///
/// # Safety
/// - `config_json` may be NULL to use the default configuration.
/// - Returns a pointer that must be freed with `fusion_evaluator_free`.
/// - Returns NULL if the configuration is invalid; call `fusion_last_error`.
#[no_mangle]
pub unsafe extern "C" fn fusion_evaluator_new(
    config_json: *const c_char,
) -> *mut FusionEvaluatorHandle {
    clear_last_error();

    let config = if config_json.is_null() {
        EngineConfig::default()
    } else {
        let json = match cstr_to_string(config_json) {
            Some(s) => s,
            None => {
                set_last_error("Invalid config string pointer");
                return ptr::null_mut();
            }
        };
        match EngineConfig::from_json(&json) {
            Ok(config) => config,
            Err(e) => {
                set_last_error(&e.to_string());
                return ptr::null_mut();
            }
        }
    };

    Box::into_raw(Box::new(FusionEvaluatorHandle { config }))
}

/// Free an evaluator handle.
///
/// # Safety
/// - `evaluator` must be a pointer returned by `fusion_evaluator_new`, or NULL.
#[no_mangle]
pub unsafe extern "C" fn fusion_evaluator_free(evaluator: *mut FusionEvaluatorHandle) {
    if !evaluator.is_null() {
        drop(Box::from_raw(evaluator));
    }
}

/// Evaluate a request JSON with the handle's configuration.
///
/// # Safety
/// - `evaluator` must be a valid pointer returned by `fusion_evaluator_new`.
/// - `request_json` must be a valid null-terminated C string.
/// - Returns a newly allocated string that must be freed with `fusion_free_string`.
/// - Returns NULL on error; call `fusion_last_error` to get the error message.
#[no_mangle]
pub unsafe extern "C" fn fusion_evaluator_evaluate(
    evaluator: *const FusionEvaluatorHandle,
    request_json: *const c_char,
) -> *mut c_char {
    clear_last_error();

    if evaluator.is_null() {
        set_last_error("Null evaluator pointer");
        return ptr::null_mut();
    }
    let handle = &*evaluator;

    let request = match cstr_to_string(request_json) {
        Some(s) => s,
        None => {
            set_last_error("Invalid request string pointer");
            return ptr::null_mut();
        }
    };

    outcome_to_cstr(evaluate_json_with_config(&request, handle.config.clone()))
}

// ============================================================================
// Memory Management
// ============================================================================

/// Free a string returned by fusion functions.
///
/// # Safety
/// - `ptr` must be a valid pointer returned by a fusion function, or NULL.
/// - After calling this function, the pointer is invalid.
#[no_mangle]
pub unsafe extern "C" fn fusion_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Get the last error message.
///
/// # Safety
/// - Returns a pointer to a thread-local error string.
/// - The returned pointer is valid until the next fusion call on this thread.
/// - Do NOT free the returned pointer.
/// - Returns NULL if no error occurred.
#[no_mangle]
pub unsafe extern "C" fn fusion_last_error() -> *const c_char {
    LAST_ERROR.with(|e| match &*e.borrow() {
        Some(cstr) => cstr.as_ptr(),
        None => ptr::null(),
    })
}

/// Get the engine version.
///
/// # Safety
/// - Returns a pointer to a static string. Do NOT free.
#[no_mangle]
pub unsafe extern "C" fn fusion_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn sample_request(role: &str, question_count: usize) -> CString {
        let frame = json!({"kind": "observation", "eyes_open": true, "gaze_on_camera": true});
        let frames = vec![frame; 10];
        let questions: Vec<Value> = (1..=question_count)
            .map(|i| {
                json!({
                    "question_id": format!("question_{i}"),
                    "video_id": format!("interview-42/q{i}.mp4"),
                    "keywords": ["index", "transaction"],
                    "transcript": "Every transaction takes a lock, and an index keeps lookups fast",
                    "frames": frames.clone(),
                    "ai_probability": 0.3
                })
            })
            .collect();
        let request = json!({ "applied_role": role, "questions": questions });
        CString::new(request.to_string()).unwrap()
    }

    unsafe fn last_error() -> String {
        let err = fusion_last_error();
        assert!(!err.is_null());
        CStr::from_ptr(err).to_str().unwrap().to_string()
    }

    #[test]
    fn test_ffi_evaluate_json() {
        let request = sample_request("software_engineer", 5);
        unsafe {
            let result = fusion_evaluate_json(request.as_ptr());
            assert!(!result.is_null());
            assert!(fusion_last_error().is_null());

            let report: Value =
                serde_json::from_str(CStr::from_ptr(result).to_str().unwrap()).unwrap();
            assert_eq!(report["success"], true);
            assert_eq!(report["result"]["overall_eye_tracking_score"], 60.0);

            fusion_free_string(result);
        }
    }

    #[test]
    fn test_ffi_evaluator_lifecycle() {
        let config = CString::new(EngineConfig::default().to_json().unwrap()).unwrap();
        let request = sample_request("it_intern", 5);
        unsafe {
            let evaluator = fusion_evaluator_new(config.as_ptr());
            assert!(!evaluator.is_null());

            let result = fusion_evaluator_evaluate(evaluator, request.as_ptr());
            assert!(!result.is_null());
            fusion_free_string(result);

            fusion_evaluator_free(evaluator);

            let default_evaluator = fusion_evaluator_new(ptr::null());
            assert!(!default_evaluator.is_null());
            fusion_evaluator_free(default_evaluator);
        }
    }

    #[test]
    fn test_ffi_error_handling() {
        unsafe {
            let result = fusion_evaluate_json(ptr::null());
            assert!(result.is_null());
            assert_eq!(last_error(), "Invalid request string pointer");

            let short = sample_request("it_intern", 3);
            let result = fusion_evaluate_json(short.as_ptr());
            assert!(result.is_null());
            assert!(last_error().contains("Expected 5 questions"));

            let bad_config = CString::new(r#"{"question_count": 0}"#).unwrap();
            assert!(fusion_evaluator_new(bad_config.as_ptr()).is_null());
            assert!(last_error().contains("configuration"));

            let request = sample_request("it_intern", 5);
            assert!(fusion_evaluator_evaluate(ptr::null(), request.as_ptr()).is_null());
        }
    }

    #[test]
    fn test_ffi_version() {
        unsafe {
            let version = fusion_version();
            let version_str = CStr::from_ptr(version).to_str().unwrap();
            assert_eq!(version_str, env!("CARGO_PKG_VERSION"));
        }
    }
}
