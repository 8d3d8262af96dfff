//! AI-generated text detection
//!
//! The pretrained classifier is an external collaborator behind the
//! [`TextClassifier`] trait. Inference needs exclusive access to the model,
//! so [`AiDetector`] owns it behind a mutex and is shared across evaluations
//! through an `Arc`.

use crate::config::DetectionConfig;
use crate::error::ClassifierError;
use crate::types::{round_to, AiDetectionResult, AiLabel};
use log::{debug, warn};
use parking_lot::Mutex;
use std::collections::HashMap;

/// Text classifier returning the probability (0-1) that a text is AI-generated
pub trait TextClassifier: Send {
    fn classify(&mut self, text: &str) -> Result<f64, ClassifierError>;

    /// Classify the answer given to one question.
    ///
    /// Defaults to classifying the text alone.
    fn classify_answer(&mut self, _question_id: &str, text: &str) -> Result<f64, ClassifierError> {
        self.classify(text)
    }
}

/// Classifier that replays outputs recorded by an earlier inference run.
///
/// Outputs are keyed by question id, so identical answers to different
/// questions keep their own output. Questions without a recorded output fail
/// as if the model call had errored.
#[derive(Debug, Clone, Default)]
pub struct ReplayClassifier {
    outputs: HashMap<String, f64>,
}

impl ReplayClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, question_id: impl Into<String>, ai_probability: f64) {
        self.outputs.insert(question_id.into(), ai_probability);
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut replay = Self::new();
        for (question_id, p) in pairs {
            replay.record(question_id, p);
        }
        replay
    }
}

impl TextClassifier for ReplayClassifier {
    fn classify(&mut self, _text: &str) -> Result<f64, ClassifierError> {
        Err(ClassifierError::Unavailable(
            "replayed outputs are keyed by question".to_string(),
        ))
    }

    fn classify_answer(&mut self, question_id: &str, _text: &str) -> Result<f64, ClassifierError> {
        self.outputs.get(question_id).copied().ok_or_else(|| {
            ClassifierError::Unavailable(format!("no recorded output for {question_id}"))
        })
    }
}

/// Shared, serialized front end to a text classifier
pub struct AiDetector {
    classifier: Mutex<Box<dyn TextClassifier>>,
    config: DetectionConfig,
}

impl AiDetector {
    pub fn new<C>(classifier: C, config: DetectionConfig) -> Self
    where
        C: TextClassifier + 'static,
    {
        Self {
            classifier: Mutex::new(Box::new(classifier)),
            config,
        }
    }

    /// Label a single text and return it with the raw AI probability (0-1).
    ///
    /// Blank and too-short texts never reach the classifier; classifier
    /// failures resolve to [`AiLabel::Error`] with probability 0.
    pub fn detect_text(&self, text: &str) -> (AiLabel, f64) {
        self.detect_with(text, |classifier| classifier.classify(text))
    }

    /// Label the answer to one question
    pub fn detect_answer(&self, question_id: &str, text: &str) -> (AiLabel, f64) {
        self.detect_with(text, |classifier| {
            classifier.classify_answer(question_id, text)
        })
    }

    fn detect_with<F>(&self, text: &str, call: F) -> (AiLabel, f64)
    where
        F: FnOnce(&mut Box<dyn TextClassifier>) -> Result<f64, ClassifierError>,
    {
        if text.trim().is_empty() {
            return (AiLabel::Empty, 0.0);
        }
        if text.chars().count() < self.config.min_text_chars {
            return (AiLabel::TooShort, 0.0);
        }

        let outcome = {
            let mut classifier = self.classifier.lock();
            call(&mut *classifier)
        };

        match outcome {
            Ok(p) if p.is_finite() && (0.0..=1.0).contains(&p) => {
                let label = if p > self.config.ai_label_threshold {
                    AiLabel::AiGenerated
                } else {
                    AiLabel::HumanWritten
                };
                (label, p)
            }
            Ok(p) => {
                warn!("AI detection error: {}", ClassifierError::InvalidProbability(p));
                (AiLabel::Error, 0.0)
            }
            Err(e) => {
                warn!("AI detection error: {e}");
                (AiLabel::Error, 0.0)
            }
        }
    }

    /// Analyze one answer into a reportable result
    pub fn analyze(&self, question_id: &str, text: &str) -> AiDetectionResult {
        let (label, p) = self.detect_answer(question_id, text);
        let human = if label.is_degenerate() { 0.0 } else { 1.0 - p };
        let result = AiDetectionResult {
            question_id: question_id.to_string(),
            detection: label,
            ai_probability: round_to(p * 100.0, 1),
            human_probability: round_to(human * 100.0, 1),
        };
        debug!(
            "analyzed response {}: {} (ai {}%)",
            question_id,
            label.as_str(),
            result.ai_probability
        );
        result
    }

    /// Analyze `(question_id, text)` pairs in order
    pub fn analyze_responses<'a, I>(&self, responses: I) -> Vec<AiDetectionResult>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        responses
            .into_iter()
            .map(|(id, text)| self.analyze(id, text))
            .collect()
    }
}

/// Percentage of answers labeled AI-generated.
///
/// Degenerate detections (empty, too short, error) stay in the denominator.
pub fn ai_answer_ratio(results: &[AiDetectionResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let ai = results
        .iter()
        .filter(|r| r.detection == AiLabel::AiGenerated)
        .count();
    ai as f64 / results.len() as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    const HUMAN_TEXT: &str = "I once debugged a flaky test for a week";
    const AI_TEXT: &str = "Certainly! Here is a comprehensive overview of the topic";

    fn detector() -> AiDetector {
        let replay = ReplayClassifier::from_pairs([("q1", 0.97), ("q2", 0.12)]);
        AiDetector::new(replay, DetectionConfig::default())
    }

    struct FailingClassifier;

    impl TextClassifier for FailingClassifier {
        fn classify(&mut self, _text: &str) -> Result<f64, ClassifierError> {
            Err(ClassifierError::Inference("model crashed".to_string()))
        }
    }

    /// Fails if it is ever entered concurrently
    struct ExclusiveClassifier {
        busy: bool,
    }

    impl TextClassifier for ExclusiveClassifier {
        fn classify(&mut self, _text: &str) -> Result<f64, ClassifierError> {
            assert!(!self.busy);
            self.busy = true;
            thread::yield_now();
            self.busy = false;
            Ok(0.2)
        }
    }

    #[test]
    fn test_sentinel_labels() {
        let detector = detector();
        assert_eq!(detector.detect_answer("q1", ""), (AiLabel::Empty, 0.0));
        assert_eq!(detector.detect_answer("q1", "too short"), (AiLabel::TooShort, 0.0));
        assert_eq!(
            detector.detect_answer("q9", "an answer nobody recorded").0,
            AiLabel::Error
        );
    }

    #[test]
    fn test_blank_text_is_empty() {
        let detector = AiDetector::new(FailingClassifier, DetectionConfig::default());
        assert_eq!(detector.detect_text("            "), (AiLabel::Empty, 0.0));
        assert_eq!(detector.detect_text("\n\t  \n   "), (AiLabel::Empty, 0.0));
    }

    #[test]
    fn test_labels_from_probability() {
        let detector = detector();
        assert_eq!(detector.detect_answer("q1", AI_TEXT).0, AiLabel::AiGenerated);
        assert_eq!(detector.detect_answer("q2", HUMAN_TEXT).0, AiLabel::HumanWritten);
    }

    #[test]
    fn test_replay_is_keyed_by_question_not_text() {
        let replay = ReplayClassifier::from_pairs([("q1", 0.95), ("q2", 0.05)]);
        let detector = AiDetector::new(replay, DetectionConfig::default());
        let text = "I am not sure about this one";
        assert_eq!(detector.detect_answer("q1", text).0, AiLabel::AiGenerated);
        assert_eq!(detector.detect_answer("q2", text).0, AiLabel::HumanWritten);
        // Same text, no recorded output for the question
        assert_eq!(detector.detect_answer("q3", text), (AiLabel::Error, 0.0));
        // Text-only classification has no question to look up
        assert_eq!(detector.detect_text(text).0, AiLabel::Error);
    }

    #[test]
    fn test_exact_threshold_is_human() {
        let replay = ReplayClassifier::from_pairs([("q1", 0.5)]);
        let detector = AiDetector::new(replay, DetectionConfig::default());
        assert_eq!(detector.detect_answer("q1", HUMAN_TEXT).0, AiLabel::HumanWritten);
    }

    #[test]
    fn test_degenerate_human_probability_is_zero() {
        let detector = AiDetector::new(FailingClassifier, DetectionConfig::default());
        let result = detector.analyze("q1", HUMAN_TEXT);
        assert_eq!(result.detection, AiLabel::Error);
        assert_eq!(result.ai_probability, 0.0);
        assert_eq!(result.human_probability, 0.0);
    }

    #[test]
    fn test_probabilities_reported_as_percentages() {
        let detector = detector();
        let result = detector.analyze("q2", HUMAN_TEXT);
        assert_eq!(result.ai_probability, 12.0);
        assert_eq!(result.human_probability, 88.0);
    }

    #[test]
    fn test_out_of_range_probability_is_error() {
        let replay = ReplayClassifier::from_pairs([("q1", 1.7)]);
        let detector = AiDetector::new(replay, DetectionConfig::default());
        assert_eq!(detector.detect_answer("q1", AI_TEXT), (AiLabel::Error, 0.0));
    }

    #[test]
    fn test_ratio_counts_degenerate_in_denominator() {
        let detector = detector();
        let results = detector.analyze_responses([
            ("q1", AI_TEXT),
            ("q2", HUMAN_TEXT),
            ("q3", ""),
            ("q4", "short"),
        ]);
        assert_eq!(ai_answer_ratio(&results), 25.0);
        assert_eq!(ai_answer_ratio(&[]), 0.0);
    }

    #[test]
    fn test_shared_detector_serializes_access() {
        let detector = Arc::new(AiDetector::new(
            ExclusiveClassifier { busy: false },
            DetectionConfig::default(),
        ));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let detector = Arc::clone(&detector);
                thread::spawn(move || {
                    for j in 0..25 {
                        let text = format!("answer number {i} variant {j}");
                        assert_eq!(detector.detect_text(&text).0, AiLabel::HumanWritten);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
