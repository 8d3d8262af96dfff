//! Pipeline orchestration
//!
//! This module provides the public API for Interview Fusion.
//! It validates a request, runs the per-question channels in sequence and
//! then the candidate-level combinators.

use crate::ai_detection::{AiDetector, ReplayClassifier};
use crate::answer::AnswerScorer;
use crate::config::EngineConfig;
use crate::encoder::ReportEncoder;
use crate::error::EvaluationError;
use crate::eye_contact::{breakdown, candidate_eye_contact, EyeContactAggregator};
use crate::personality::{average_traits, RoleScorer, SeededTraitSimulator, TraitSimulator};
use crate::scoring::{content_score, FinalScoreCombinator};
use crate::suspicion::SuspicionCombinator;
use crate::types::{EvaluationRequest, EvaluationResult, Trait};
use log::{debug, info, warn};
use std::collections::HashSet;
use std::sync::Arc;

/// Evaluate a JSON request with the default configuration (stateless, one-shot).
///
/// Classifier outputs are replayed from each question's `ai_probability`
/// and trait vectors come from the seeded simulator unless supplied.
///
/// # Returns
/// Report envelope JSON
///
/// # Example
/// ```ignore
/// let report_json = evaluate_json(request_json)?;
/// ```
pub fn evaluate_json(request_json: &str) -> Result<String, EvaluationError> {
    evaluate_json_with_config(request_json, EngineConfig::default())
}

/// Evaluate a JSON request with an explicit configuration
pub fn evaluate_json_with_config(
    request_json: &str,
    config: EngineConfig,
) -> Result<String, EvaluationError> {
    let request: EvaluationRequest = serde_json::from_str(request_json)?;
    let detector = Arc::new(AiDetector::new(
        replay_classifier(&request),
        config.detection.clone(),
    ));
    let evaluator = Evaluator::new(config, detector, Arc::new(SeededTraitSimulator))?;
    let result = evaluator.evaluate(&request)?;
    ReportEncoder::new().encode_to_json(&result)
}

/// Classifier replaying the `ai_probability` recorded for each question
pub fn replay_classifier(request: &EvaluationRequest) -> ReplayClassifier {
    ReplayClassifier::from_pairs(
        request
            .questions
            .iter()
            .filter_map(|q| q.ai_probability.map(|p| (q.question_id.clone(), p))),
    )
}

/// Interview evaluator.
///
/// Holds no per-request state; the shared classifier is serialized inside
/// [`AiDetector`], so one evaluator can serve concurrent requests.
pub struct Evaluator {
    config: EngineConfig,
    detector: Arc<AiDetector>,
    simulator: Arc<dyn TraitSimulator>,
    answers: AnswerScorer,
    eye_contact: EyeContactAggregator,
    roles: RoleScorer,
    suspicion: SuspicionCombinator,
    final_score: FinalScoreCombinator,
}

impl Evaluator {
    /// Create an evaluator after validating the configuration
    pub fn new(
        config: EngineConfig,
        detector: Arc<AiDetector>,
        simulator: Arc<dyn TraitSimulator>,
    ) -> Result<Self, EvaluationError> {
        config.validate()?;
        Ok(Self {
            answers: AnswerScorer::new(config.answer.clone()),
            eye_contact: EyeContactAggregator::new(config.eye_tracking.clone()),
            roles: RoleScorer::new(config.roles.clone()),
            suspicion: SuspicionCombinator::new(config.suspicion.clone()),
            final_score: FinalScoreCombinator::new(config.final_score.clone()),
            config,
            detector,
            simulator,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Check a request without scoring it
    pub fn validate_request(&self, request: &EvaluationRequest) -> Result<(), EvaluationError> {
        if request.applied_role.trim().is_empty() {
            return Err(EvaluationError::InvalidRole(
                "applied role must not be empty".to_string(),
            ));
        }
        if request.questions.len() != self.config.question_count {
            return Err(EvaluationError::InvalidQuestionCount {
                expected: self.config.question_count,
                actual: request.questions.len(),
            });
        }

        let mut seen = HashSet::new();
        for question in &request.questions {
            let id = question.question_id.as_str();
            if id.trim().is_empty() {
                return Err(EvaluationError::InvalidInput(
                    "question_id must not be empty".to_string(),
                ));
            }
            if !seen.insert(id) {
                return Err(EvaluationError::DuplicateQuestion(id.to_string()));
            }
            if question.video_id.trim().is_empty() {
                return Err(EvaluationError::MissingVideo(id.to_string()));
            }
            if question.keywords.is_empty() {
                return Err(EvaluationError::MissingKeywords(id.to_string()));
            }
            if question.keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(EvaluationError::InvalidInput(format!(
                    "keywords for {id} must not contain blank entries"
                )));
            }
            if let Some(p) = question.ai_probability {
                if !(0.0..=1.0).contains(&p) {
                    return Err(EvaluationError::InvalidInput(format!(
                        "ai_probability for {id} must be in [0, 1], got {p}"
                    )));
                }
            }
            if let Some(traits) = &question.traits {
                if let Some(t) = Trait::ALL
                    .iter()
                    .find(|t| !(0.0..=1.0).contains(&traits.get(**t)))
                {
                    return Err(EvaluationError::InvalidInput(format!(
                        "trait {} for {id} must be in [0, 1], got {}",
                        t.as_str(),
                        traits.get(*t)
                    )));
                }
            }
        }

        if !self.roles.has_role(&request.applied_role) {
            warn!(
                "applied role {} has no weight set; it scores 0",
                request.applied_role
            );
        }
        Ok(())
    }

    /// Evaluate every question in sequence, then combine.
    ///
    /// Degenerate channels (zero frames, empty transcript, classifier
    /// failure) resolve to zero/neutral values instead of errors.
    pub fn evaluate(&self, request: &EvaluationRequest) -> Result<EvaluationResult, EvaluationError> {
        self.validate_request(request)?;
        info!(
            "evaluating {} questions for role {}",
            request.questions.len(),
            request.applied_role
        );

        let n = request.questions.len();
        let mut question_results = Vec::with_capacity(n);
        let mut trait_vectors = Vec::with_capacity(n);
        let mut eye_scores = Vec::with_capacity(n);
        let mut answer_analysis = Vec::with_capacity(n);
        let mut question_ids = Vec::with_capacity(n);

        for question in &request.questions {
            let id = question.question_id.as_str();
            let transcript = question.transcript.as_deref().unwrap_or("");
            if transcript.trim().is_empty() {
                warn!("{id}: no transcript, answer scored as empty");
            }

            let result = self.answers.evaluate(id, transcript, &question.keywords);

            let traits = match question.traits {
                Some(traits) => traits,
                None => self.simulator.simulate(&question.video_id),
            };

            let eye = self.eye_contact.score_video(&question.frames);
            if eye.is_degenerate() {
                warn!("{id}: video {} yielded no frames", question.video_id);
            }

            let analysis = self.detector.analyze(id, transcript);

            debug!(
                "{id}: content={}% eye_contact={:.2}% ai_label={}",
                result.score,
                eye.percentage,
                analysis.detection.as_str()
            );

            question_ids.push(id.to_string());
            question_results.push(result);
            trait_vectors.push(traits);
            eye_scores.push(eye.percentage);
            answer_analysis.push(analysis);
        }

        let personality_traits = average_traits(&trait_vectors).ok_or_else(|| {
            EvaluationError::Internal("no trait vectors to average".to_string())
        })?;
        let career_scores = self.roles.score(&personality_traits);

        let overall_eye = candidate_eye_contact(&eye_scores);
        let eye_track_per_question = breakdown(&question_ids, &eye_scores);

        let factors = self.suspicion.evaluate_factors(
            &question_results,
            &career_scores,
            &request.applied_role,
            overall_eye,
            &personality_traits,
        );
        let report = self
            .suspicion
            .combine(factors, answer_analysis, &request.applied_role);

        let final_evaluation = self.final_score.combine(
            content_score(&question_results),
            overall_eye,
            personality_traits.mean(),
            report.overall_suspicion_score,
        )?;
        info!(
            "final score {:.1} (base {:.1})",
            final_evaluation.final_score, final_evaluation.base_score
        );

        Ok(EvaluationResult {
            question_results,
            career_scores,
            eye_track_per_question,
            overall_eye_tracking_score: overall_eye,
            personality_traits,
            ai_detection_results: report,
            final_evaluation,
        })
    }
}
