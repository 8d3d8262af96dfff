//! Suspicion scoring
//!
//! Four boolean risk predicates are evaluated over the aggregated results.
//! Each true predicate adds a fixed weight to the behavioral suspicion score,
//! which is then averaged with the AI-answer ratio into the overall verdict.

use crate::ai_detection::ai_answer_ratio;
use crate::config::SuspicionConfig;
use crate::types::{
    clamp_pct, round_to, AiDetectionResult, QuestionResult, RoleScoreSet, SuspicionFactors,
    SuspicionReport, TraitVector,
};
use log::info;

/// Combinator for behavioral and AI-text suspicion
#[derive(Debug, Clone, Default)]
pub struct SuspicionCombinator {
    config: SuspicionConfig,
}

impl SuspicionCombinator {
    pub fn new(config: SuspicionConfig) -> Self {
        Self { config }
    }

    /// Every answer scored 100%
    pub fn perfect_answers(&self, results: &[QuestionResult]) -> bool {
        results.iter().all(|r| r.score == 100)
    }

    /// Applied role trails the best-fitting role by more than the allowed gap.
    ///
    /// The reference role never mismatches; an unknown role scores 0.
    pub fn role_mismatch(&self, role_scores: &RoleScoreSet, applied_role: &str) -> bool {
        if applied_role == self.config.reference_role {
            return false;
        }
        let best = role_scores.values().copied().max().unwrap_or(0) as i64;
        let applied = role_scores.get(applied_role).copied().unwrap_or(0) as i64;
        best - applied > self.config.role_mismatch_gap as i64
    }

    pub fn low_eye_contact(&self, eye_contact_pct: f64) -> bool {
        eye_contact_pct < self.config.low_eye_contact_threshold
    }

    /// Implausibly ideal personality profile
    pub fn unnatural_traits(&self, traits: &TraitVector) -> bool {
        traits.neuroticism < self.config.max_neuroticism
            && traits.conscientiousness > self.config.min_conscientiousness
            && traits.agreeableness > self.config.min_agreeableness
    }

    pub fn evaluate_factors(
        &self,
        results: &[QuestionResult],
        role_scores: &RoleScoreSet,
        applied_role: &str,
        eye_contact_pct: f64,
        traits: &TraitVector,
    ) -> SuspicionFactors {
        SuspicionFactors {
            perfect_answers: self.perfect_answers(results),
            role_mismatch: self.role_mismatch(role_scores, applied_role),
            low_eye_contact: self.low_eye_contact(eye_contact_pct),
            unnatural_traits: self.unnatural_traits(traits),
        }
    }

    /// Blend behavioral suspicion with the AI-answer ratio.
    ///
    /// `is_suspicious` is decided on the unrounded overall score; the report
    /// carries the ratio and overall score rounded to one decimal.
    pub fn combine(
        &self,
        factors: SuspicionFactors,
        answer_analysis: Vec<AiDetectionResult>,
        applied_role: &str,
    ) -> SuspicionReport {
        let behavioral = clamp_pct(factors.count() as f64 * self.config.factor_weight);
        let ratio = clamp_pct(ai_answer_ratio(&answer_analysis));
        let overall = clamp_pct(((behavioral + ratio) / 2.0).min(100.0));
        let is_suspicious = overall >= self.config.suspicious_threshold;

        info!(
            "suspicion: behavioral={behavioral} ai_ratio={ratio:.1} overall={overall:.1} suspicious={is_suspicious}"
        );

        SuspicionReport {
            answer_analysis,
            suspicion_factors: factors,
            behavioral_suspicion_score: behavioral,
            ai_answer_ratio: round_to(ratio, 1),
            overall_suspicion_score: round_to(overall, 1),
            is_suspicious,
            applied_role: applied_role.to_string(),
        }
    }
}
