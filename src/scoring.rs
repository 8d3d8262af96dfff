//! Final score combination
//!
//! Blends content, eye-contact and personality scores into a base score and
//! applies a penalty proportional to the overall suspicion score.

use crate::config::FinalScoreConfig;
use crate::error::EvaluationError;
use crate::types::{clamp_pct, round_to, FinalEvaluation, QuestionResult};

/// Mean keyword coverage across answers (0 when there are none)
pub fn content_score(results: &[QuestionResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    results.iter().map(|r| r.score as f64).sum::<f64>() / results.len() as f64
}

/// Weighted blend with suspicion penalty
#[derive(Debug, Clone, Default)]
pub struct FinalScoreCombinator {
    config: FinalScoreConfig,
}

impl FinalScoreCombinator {
    pub fn new(config: FinalScoreConfig) -> Self {
        Self { config }
    }

    /// Combine the four scalar inputs.
    ///
    /// * `content` - mean answer coverage (0-100)
    /// * `eye_contact` - candidate eye-contact percentage (0-100)
    /// * `trait_mean` - mean of the averaged trait values (0-1)
    /// * `suspicion` - overall suspicion score (0-100)
    pub fn combine(
        &self,
        content: f64,
        eye_contact: f64,
        trait_mean: f64,
        suspicion: f64,
    ) -> Result<FinalEvaluation, EvaluationError> {
        for (name, value) in [
            ("content", content),
            ("eye_contact", eye_contact),
            ("trait_mean", trait_mean),
            ("suspicion", suspicion),
        ] {
            if !value.is_finite() {
                return Err(EvaluationError::Internal(format!(
                    "non-finite {name} score: {value}"
                )));
            }
        }

        let content = clamp_pct(content);
        let eye_contact = clamp_pct(eye_contact);
        let personality = clamp_pct(trait_mean * 100.0);
        let suspicion = clamp_pct(suspicion);

        let base = self.config.content_weight * content
            + self.config.eye_contact_weight * eye_contact
            + self.config.personality_weight * personality;
        let penalty = suspicion / 100.0 * self.config.max_suspicion_penalty;
        let final_score = (base * (1.0 - penalty)).max(0.0);

        Ok(FinalEvaluation {
            content_score: round_to(content, 1),
            eye_contact_score: round_to(eye_contact, 1),
            personality_score: round_to(personality, 1),
            ai_suspicion_score: suspicion,
            base_score: round_to(base, 1),
            final_score: round_to(final_score, 1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FeedbackTier;

    #[test]
    fn test_no_suspicion_keeps_base() {
        let combinator = FinalScoreCombinator::default();
        let eval = combinator.combine(80.0, 50.0, 0.6, 0.0).unwrap();
        // 0.5*80 + 0.2*50 + 0.3*60 = 68
        assert_eq!(eval.base_score, 68.0);
        assert_eq!(eval.final_score, 68.0);
        assert_eq!(eval.personality_score, 60.0);
    }

    #[test]
    fn test_full_suspicion_removes_thirty_percent() {
        let combinator = FinalScoreCombinator::default();
        let eval = combinator.combine(100.0, 100.0, 1.0, 100.0).unwrap();
        assert_eq!(eval.base_score, 100.0);
        assert_eq!(eval.final_score, 70.0);
    }

    #[test]
    fn test_final_never_exceeds_base_or_drops_below_zero() {
        let combinator = FinalScoreCombinator::default();
        for suspicion in [0.0, 12.5, 50.0, 87.5, 100.0] {
            for content in [0.0, 40.0, 100.0] {
                let eval = combinator.combine(content, 30.0, 0.5, suspicion).unwrap();
                assert!(eval.final_score >= 0.0);
                assert!(eval.final_score <= eval.base_score);
            }
        }
    }

    #[test]
    fn test_non_finite_input_is_internal_error() {
        let combinator = FinalScoreCombinator::default();
        let err = combinator.combine(f64::NAN, 0.0, 0.5, 0.0).unwrap_err();
        assert!(matches!(err, EvaluationError::Internal(_)));
    }

    #[test]
    fn test_content_score_mean() {
        let results: Vec<QuestionResult> = [100, 60, 20]
            .iter()
            .map(|s| QuestionResult {
                question_id: "q".to_string(),
                score: *s,
                keywords_found: vec![],
                keywords_missing: vec![],
                feedback_tier: FeedbackTier::Good,
                feedback: String::new(),
                transcription: String::new(),
            })
            .collect();
        assert_eq!(content_score(&results), 60.0);
        assert_eq!(content_score(&[]), 0.0);
    }
}
