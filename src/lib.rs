//! Interview Fusion - Signal fusion and suspicion scoring for recorded interviews
//!
//! The engine turns per-question signals into one candidate evaluation through
//! a deterministic pipeline: frame debouncing → eye-contact aggregation,
//! keyword scoring, trait averaging and role fit, AI-text aggregation →
//! suspicion combination → final weighted score.
//!
//! ## Modules
//!
//! - **Signals**: stability windows, gaze geometry, eye-contact aggregation
//! - **Answers**: keyword coverage and AI-text detection
//! - **Scoring**: personality role fit, suspicion factors, final score

pub mod ai_detection;
pub mod answer;
pub mod config;
pub mod encoder;
pub mod error;
pub mod eye_contact;
pub mod gaze;
pub mod personality;
pub mod pipeline;
pub mod scoring;
pub mod stability;
pub mod suspicion;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use ai_detection::{AiDetector, ReplayClassifier, TextClassifier};
pub use config::EngineConfig;
pub use encoder::{ReportEncoder, ReportEnvelope};
pub use error::{ClassifierError, EvaluationError};
pub use personality::{FixedTraitSimulator, SeededTraitSimulator, TraitSimulator};
pub use pipeline::{evaluate_json, evaluate_json_with_config, Evaluator};
pub use types::{EvaluationRequest, EvaluationResult};

/// Engine version embedded in every report
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for report envelopes
pub const PRODUCER_NAME: &str = "interview-fusion";
