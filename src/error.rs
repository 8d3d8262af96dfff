//! Error types for Interview Fusion

use thiserror::Error;

/// Errors that can occur while evaluating an interview
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Missing video for question: {0}")]
    MissingVideo(String),

    #[error("No keywords provided for {0}")]
    MissingKeywords(String),

    #[error("Expected {expected} questions, got {actual}")]
    InvalidQuestionCount { expected: usize, actual: usize },

    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),

    #[error("Invalid applied role: {0}")]
    InvalidRole(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Internal computation error: {0}")]
    Internal(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

impl EvaluationError {
    /// True for the errors raised by request validation before any scoring
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            EvaluationError::MissingVideo(_)
                | EvaluationError::MissingKeywords(_)
                | EvaluationError::InvalidQuestionCount { .. }
                | EvaluationError::DuplicateQuestion(_)
                | EvaluationError::InvalidRole(_)
                | EvaluationError::InvalidInput(_)
                | EvaluationError::JsonError(_)
        )
    }
}

/// Failure reported by an external text classifier
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier unavailable: {0}")]
    Unavailable(String),

    #[error("Classifier inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned out-of-range probability: {0}")]
    InvalidProbability(f64),
}
