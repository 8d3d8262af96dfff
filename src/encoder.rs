//! Report encoding
//!
//! This module wraps an evaluation result into a versioned report envelope
//! and renders the display form, where percentages are formatted strings.

use crate::error::EvaluationError;
use crate::types::EvaluationResult;
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// Current report format version
pub const REPORT_VERSION: &str = "1.0.0";

/// Producer metadata stamped on every report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Versioned envelope around one evaluation result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEnvelope {
    pub report_version: String,
    pub producer: ReportProducer,
    pub computed_at_utc: String,
    pub success: bool,
    pub result: EvaluationResult,
}

/// Report encoder for producing envelope JSON
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    fn producer(&self) -> ReportProducer {
        ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        }
    }

    /// Wrap a result in an envelope stamped with the current time
    pub fn encode(&self, result: &EvaluationResult) -> ReportEnvelope {
        ReportEnvelope {
            report_version: REPORT_VERSION.to_string(),
            producer: self.producer(),
            computed_at_utc: Utc::now().to_rfc3339(),
            success: true,
            result: result.clone(),
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, result: &EvaluationResult) -> Result<String, EvaluationError> {
        let envelope = self.encode(result);
        serde_json::to_string_pretty(&envelope).map_err(EvaluationError::JsonError)
    }

    /// Failure envelope carrying an error message instead of a result
    pub fn encode_error(&self, error: &EvaluationError) -> Result<String, EvaluationError> {
        let value = json!({
            "report_version": REPORT_VERSION,
            "producer": self.producer(),
            "computed_at_utc": Utc::now().to_rfc3339(),
            "success": false,
            "error": error.to_string(),
        });
        serde_json::to_string_pretty(&value).map_err(EvaluationError::JsonError)
    }

    /// Display form of a result: scores rendered as percentage strings
    ///
    /// Answer scores and suspicion scores use whole percents ("80%"), the
    /// candidate eye-contact score keeps two decimals ("80.00%").
    pub fn display(&self, result: &EvaluationResult) -> Result<Value, EvaluationError> {
        let mut value = serde_json::to_value(result)?;

        if let Some(questions) = value["question_results"].as_array_mut() {
            for (entry, q) in questions.iter_mut().zip(&result.question_results) {
                entry["score"] = json!(format!("{}%", q.score));
            }
        }
        value["overall_eye_tracking_score"] =
            json!(format!("{:.2}%", result.overall_eye_tracking_score));

        let report = &result.ai_detection_results;
        let ai = &mut value["ai_detection_results"];
        ai["behavioral_suspicion_score"] =
            json!(format!("{:.0}%", report.behavioral_suspicion_score));
        ai["ai_answer_ratio"] = json!(format!("{:.0}%", report.ai_answer_ratio));
        ai["overall_suspicion_score"] = json!(format!("{:.0}%", report.overall_suspicion_score));

        value["success"] = json!(true);
        Ok(value)
    }
}
