//! Core types for the Interview Fusion pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw per-frame inputs, per-question results, candidate-level
//! aggregates, and the final evaluation record.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw per-frame booleans derived from facial geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameObservation {
    pub eyes_open: bool,
    pub gaze_on_camera: bool,
}

/// Per-frame geometry reported by the landmark provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LandmarkReading {
    /// Head pitch (degrees)
    pub pitch: f64,
    /// Head yaw (degrees)
    pub yaw: f64,
    /// Head roll (degrees)
    pub roll: f64,
    /// Left eye aspect ratio
    pub left_ear: f64,
    /// Right eye aspect ratio
    pub right_ear: f64,
}

/// One video frame as delivered to the engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameInput {
    /// Booleans already derived upstream
    Observation(FrameObservation),
    /// Head pose and eye aspect ratios, converted by the gaze module
    Landmarks(LandmarkReading),
    /// No face detected in the frame
    NoFace,
}

/// Feedback tier chosen from keyword coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackTier {
    NoAnswer,
    Excellent,
    Good,
    NeedsReview,
}

impl FeedbackTier {
    pub fn message(&self) -> &'static str {
        match self {
            FeedbackTier::NoAnswer => "No answer detected",
            FeedbackTier::Excellent => "Excellent! You mentioned most key concepts.",
            FeedbackTier::Good => "Good attempt, but some important concepts were missing.",
            FeedbackTier::NeedsReview => {
                "You missed many key concepts. Please review the material."
            }
        }
    }
}

/// Keyword coverage result for a single answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    /// Coverage percentage (0-100)
    pub score: u32,
    pub keywords_found: Vec<String>,
    pub keywords_missing: Vec<String>,
    pub feedback_tier: FeedbackTier,
    pub feedback: String,
    pub transcription: String,
}

/// Big Five trait identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }
}

/// Personality trait vector, every value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TraitVector {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
}

impl TraitVector {
    /// Build a vector, clamping every value into [0, 1]
    pub fn new(
        openness: f64,
        conscientiousness: f64,
        extraversion: f64,
        agreeableness: f64,
        neuroticism: f64,
    ) -> Self {
        Self {
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        }
        .clamped()
    }

    pub fn get(&self, t: Trait) -> f64 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    pub fn set(&mut self, t: Trait, value: f64) {
        match t {
            Trait::Openness => self.openness = value,
            Trait::Conscientiousness => self.conscientiousness = value,
            Trait::Extraversion => self.extraversion = value,
            Trait::Agreeableness => self.agreeableness = value,
            Trait::Neuroticism => self.neuroticism = value,
        }
    }

    /// Arithmetic mean of the five trait values
    pub fn mean(&self) -> f64 {
        Trait::ALL.iter().map(|t| self.get(*t)).sum::<f64>() / Trait::ALL.len() as f64
    }

    /// Copy with every value clamped into [0, 1] (NaN maps to 0)
    pub fn clamped(mut self) -> Self {
        for t in Trait::ALL {
            let v = self.get(t);
            self.set(t, if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) });
        }
        self
    }
}

/// Role identifier to integer fit percentage
pub type RoleScoreSet = BTreeMap<String, u32>;

/// Label reported by the AI-text classifier stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiLabel {
    Empty,
    TooShort,
    #[serde(rename = "AI-generated")]
    AiGenerated,
    #[serde(rename = "Human-written")]
    HumanWritten,
    Error,
}

impl AiLabel {
    /// Labels produced without a usable classifier verdict
    pub fn is_degenerate(&self) -> bool {
        matches!(self, AiLabel::Empty | AiLabel::TooShort | AiLabel::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiLabel::Empty => "Empty",
            AiLabel::TooShort => "TooShort",
            AiLabel::AiGenerated => "AI-generated",
            AiLabel::HumanWritten => "Human-written",
            AiLabel::Error => "Error",
        }
    }
}

/// Per-question AI-text detection outcome (probabilities as percentages)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiDetectionResult {
    pub question_id: String,
    pub detection: AiLabel,
    pub ai_probability: f64,
    pub human_probability: f64,
}

/// Boolean risk predicates feeding the behavioral suspicion score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuspicionFactors {
    pub perfect_answers: bool,
    pub role_mismatch: bool,
    pub low_eye_contact: bool,
    pub unnatural_traits: bool,
}

impl SuspicionFactors {
    /// Number of predicates that hold
    pub fn count(&self) -> u32 {
        [
            self.perfect_answers,
            self.role_mismatch,
            self.low_eye_contact,
            self.unnatural_traits,
        ]
        .iter()
        .filter(|f| **f)
        .count() as u32
    }
}

/// Combined AI-text and behavioral suspicion verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionReport {
    pub answer_analysis: Vec<AiDetectionResult>,
    pub suspicion_factors: SuspicionFactors,
    /// Behavioral suspicion (0-100, multiples of the factor weight)
    pub behavioral_suspicion_score: f64,
    /// Share of answers labeled AI-generated (0-100, one decimal)
    pub ai_answer_ratio: f64,
    /// Overall suspicion (0-100, one decimal)
    pub overall_suspicion_score: f64,
    pub is_suspicious: bool,
    pub applied_role: String,
}

/// Eye-contact percentage for one question, formatted for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EyeContactEntry {
    pub question: String,
    pub score: String,
}

/// Final weighted score breakdown (one decimal each)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinalEvaluation {
    pub content_score: f64,
    pub eye_contact_score: f64,
    pub personality_score: f64,
    pub ai_suspicion_score: f64,
    pub base_score: f64,
    pub final_score: f64,
}

/// Complete evaluation record for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub question_results: Vec<QuestionResult>,
    pub career_scores: RoleScoreSet,
    pub eye_track_per_question: Vec<EyeContactEntry>,
    /// Candidate-level eye-contact percentage (two decimals)
    pub overall_eye_tracking_score: f64,
    pub personality_traits: TraitVector,
    pub ai_detection_results: SuspicionReport,
    pub final_evaluation: FinalEvaluation,
}

/// One recorded answer submitted for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionInput {
    pub question_id: String,
    /// Stable identity of the recording (seeds the trait simulator)
    pub video_id: String,
    pub keywords: Vec<String>,
    /// Transcript from the transcription provider; absent on failure
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub frames: Vec<FrameInput>,
    /// Classifier AI probability (0-1); absent when the classifier failed
    #[serde(default)]
    pub ai_probability: Option<f64>,
    /// Trait vector supplied by an upstream estimator, bypassing simulation
    #[serde(default)]
    pub traits: Option<TraitVector>,
}

/// Evaluation request covering every question of an interview
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub applied_role: String,
    pub questions: Vec<QuestionInput>,
}

/// Round to a fixed number of decimals, ties to even.
///
/// Rounds the exact decimal value of `value` rather than a scaled product,
/// so 1.115 (stored as 1.11499...) rounds to 1.11.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.decimals$}").parse().unwrap_or(value)
}

/// Clamp a percentage into [0, 100], mapping NaN to 0
pub fn clamp_pct(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
