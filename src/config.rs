//! Engine configuration
//!
//! Every threshold, weight and role table used by the scoring stages lives
//! here as data so it can be tuned and tested apart from the combinators.

use crate::error::EvaluationError;
use crate::types::Trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reference role exempt from the role-mismatch predicate
pub const REFERENCE_ROLE: &str = "software_engineer";

/// Tolerance when checking that a role weight set sums to 1.0
const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// One term of a role weight set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoleWeight {
    #[serde(rename = "trait")]
    pub trait_name: Trait,
    pub weight: f64,
    /// Use `1 - value` instead of the raw trait value
    #[serde(default)]
    pub inverted: bool,
}

impl RoleWeight {
    pub const fn direct(trait_name: Trait, weight: f64) -> Self {
        Self {
            trait_name,
            weight,
            inverted: false,
        }
    }

    pub const fn inverted(trait_name: Trait, weight: f64) -> Self {
        Self {
            trait_name,
            weight,
            inverted: true,
        }
    }
}

/// Stability window and geometry thresholds for eye tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeTrackingConfig {
    /// Consecutive frames required for a stable eye-openness state
    pub eye_window: usize,
    /// Consecutive frames required for a stable gaze direction
    pub gaze_window: usize,
    /// Eye aspect ratio above which an eye counts as open
    pub min_eye_openness: f64,
    /// Maximum yaw (degrees); pitch and roll limits derive from it
    pub max_head_angle: f64,
    pub pitch_factor: f64,
    pub roll_factor: f64,
}

impl Default for EyeTrackingConfig {
    fn default() -> Self {
        Self {
            eye_window: 3,
            gaze_window: 5,
            min_eye_openness: 0.25,
            max_head_angle: 20.0,
            pitch_factor: 1.5,
            roll_factor: 2.0,
        }
    }
}

/// Keyword coverage feedback thresholds (fractions)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    pub excellent_threshold: f64,
    pub good_threshold: f64,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            excellent_threshold: 0.8,
            good_threshold: 0.5,
        }
    }
}

/// AI-text detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Texts shorter than this (in characters) are labeled TooShort
    pub min_text_chars: usize,
    /// Probability above which a text is labeled AI-generated
    pub ai_label_threshold: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            min_text_chars: 10,
            ai_label_threshold: 0.5,
        }
    }
}

/// Suspicion predicate thresholds and weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuspicionConfig {
    pub reference_role: String,
    /// Best-role minus applied-role gap that counts as a mismatch
    pub role_mismatch_gap: u32,
    /// Eye-contact percentage below which contact counts as low
    pub low_eye_contact_threshold: f64,
    pub max_neuroticism: f64,
    pub min_conscientiousness: f64,
    pub min_agreeableness: f64,
    /// Points contributed by each true predicate
    pub factor_weight: f64,
    /// Overall score at or above which the candidate is suspicious
    pub suspicious_threshold: f64,
}

impl Default for SuspicionConfig {
    fn default() -> Self {
        Self {
            reference_role: REFERENCE_ROLE.to_string(),
            role_mismatch_gap: 20,
            low_eye_contact_threshold: 30.0,
            max_neuroticism: 0.2,
            min_conscientiousness: 0.9,
            min_agreeableness: 0.9,
            factor_weight: 25.0,
            suspicious_threshold: 50.0,
        }
    }
}

/// Final score blend weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalScoreConfig {
    pub content_weight: f64,
    pub eye_contact_weight: f64,
    pub personality_weight: f64,
    /// Largest fraction of the base score suspicion can remove
    pub max_suspicion_penalty: f64,
}

impl Default for FinalScoreConfig {
    fn default() -> Self {
        Self {
            content_weight: 0.5,
            eye_contact_weight: 0.2,
            personality_weight: 0.3,
            max_suspicion_penalty: 0.3,
        }
    }
}

/// Runtime configuration for the evaluation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of questions every request must carry
    pub question_count: usize,
    pub eye_tracking: EyeTrackingConfig,
    pub answer: AnswerConfig,
    pub detection: DetectionConfig,
    pub roles: BTreeMap<String, Vec<RoleWeight>>,
    pub suspicion: SuspicionConfig,
    pub final_score: FinalScoreConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            question_count: 5,
            eye_tracking: EyeTrackingConfig::default(),
            answer: AnswerConfig::default(),
            detection: DetectionConfig::default(),
            roles: default_roles(),
            suspicion: SuspicionConfig::default(),
            final_score: FinalScoreConfig::default(),
        }
    }
}

/// Built-in role weight sets
pub fn default_roles() -> BTreeMap<String, Vec<RoleWeight>> {
    use Trait::*;

    let mut roles = BTreeMap::new();
    roles.insert(
        "software_engineer".to_string(),
        vec![
            RoleWeight::direct(Conscientiousness, 0.4),
            RoleWeight::direct(Openness, 0.3),
            RoleWeight::inverted(Neuroticism, 0.3),
        ],
    );
    roles.insert(
        "associate_software_engineer".to_string(),
        vec![
            RoleWeight::direct(Conscientiousness, 0.3),
            RoleWeight::direct(Agreeableness, 0.2),
            RoleWeight::direct(Openness, 0.2),
            RoleWeight::inverted(Neuroticism, 0.3),
        ],
    );
    roles.insert(
        "it_intern".to_string(),
        vec![
            RoleWeight::direct(Openness, 0.4),
            RoleWeight::direct(Extraversion, 0.2),
            RoleWeight::direct(Agreeableness, 0.1),
            RoleWeight::inverted(Neuroticism, 0.3),
        ],
    );
    roles
}

impl EngineConfig {
    /// Load configuration from JSON, filling omitted sections with defaults
    pub fn from_json(json: &str) -> Result<Self, EvaluationError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to pretty JSON
    pub fn to_json(&self) -> Result<String, EvaluationError> {
        serde_json::to_string_pretty(self).map_err(|e| EvaluationError::EncodingError(e.to_string()))
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), EvaluationError> {
        if self.question_count == 0 {
            return Err(EvaluationError::Config(
                "question_count must be >= 1".to_string(),
            ));
        }

        let eye = &self.eye_tracking;
        if eye.eye_window == 0 || eye.gaze_window == 0 {
            return Err(EvaluationError::Config(format!(
                "stability windows must be >= 1, got eye={} gaze={}",
                eye.eye_window, eye.gaze_window
            )));
        }
        if eye.max_head_angle <= 0.0 || eye.pitch_factor <= 0.0 || eye.roll_factor <= 0.0 {
            return Err(EvaluationError::Config(
                "head angle limits must be > 0".to_string(),
            ));
        }

        let answer = &self.answer;
        if !(0.0..=1.0).contains(&answer.good_threshold)
            || !(0.0..=1.0).contains(&answer.excellent_threshold)
            || answer.good_threshold > answer.excellent_threshold
        {
            return Err(EvaluationError::Config(format!(
                "feedback thresholds must satisfy 0 <= good <= excellent <= 1, got {} and {}",
                answer.good_threshold, answer.excellent_threshold
            )));
        }

        if !(0.0..=1.0).contains(&self.detection.ai_label_threshold) {
            return Err(EvaluationError::Config(format!(
                "ai_label_threshold must be in [0, 1], got {}",
                self.detection.ai_label_threshold
            )));
        }

        if self.roles.is_empty() {
            return Err(EvaluationError::Config(
                "at least one role weight set is required".to_string(),
            ));
        }
        for (role, weights) in &self.roles {
            if weights.iter().any(|w| w.weight < 0.0) {
                return Err(EvaluationError::Config(format!(
                    "role {role} has a negative weight"
                )));
            }
            let sum: f64 = weights.iter().map(|w| w.weight).sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                return Err(EvaluationError::Config(format!(
                    "role {role} weights must sum to 1.0, got {sum}"
                )));
            }
        }

        let s = &self.suspicion;
        if !(0.0..=100.0).contains(&s.suspicious_threshold) {
            return Err(EvaluationError::Config(format!(
                "suspicious_threshold must be in [0, 100], got {}",
                s.suspicious_threshold
            )));
        }
        if !(0.0..=25.0).contains(&s.factor_weight) {
            return Err(EvaluationError::Config(format!(
                "factor_weight must be in [0, 25], got {}",
                s.factor_weight
            )));
        }

        let f = &self.final_score;
        let blend = f.content_weight + f.eye_contact_weight + f.personality_weight;
        if (blend - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(EvaluationError::Config(format!(
                "final score weights must sum to 1.0, got {blend}"
            )));
        }
        if !(0.0..=1.0).contains(&f.max_suspicion_penalty) {
            return Err(EvaluationError::Config(format!(
                "max_suspicion_penalty must be in [0, 1], got {}",
                f.max_suspicion_penalty
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_role_weights_sum_to_one() {
        for (role, weights) in default_roles() {
            let sum: f64 = weights.iter().map(|w| w.weight).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{role} sums to {sum}");
        }
    }

    #[test]
    fn test_rejects_unbalanced_role() {
        let mut config = EngineConfig::default();
        config.roles.insert(
            "data_scientist".to_string(),
            vec![RoleWeight::direct(Trait::Openness, 0.7)],
        );
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("data_scientist"));
    }

    #[test]
    fn test_rejects_zero_window() {
        let mut config = EngineConfig::default();
        config.eye_tracking.gaze_window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{"question_count": 3}"#).unwrap();
        assert_eq!(config.question_count, 3);
        assert_eq!(config.eye_tracking.eye_window, 3);
        assert_eq!(config.roles.len(), 3);
    }

    #[test]
    fn test_json_roundtrip_preserves_roles() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let loaded = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, loaded);
    }
}
