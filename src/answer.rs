//! Answer scoring
//!
//! Keyword coverage of a transcript: each keyword is found when it occurs as
//! a case-insensitive substring. The result is a pure function of the
//! transcript and keyword list.

use crate::config::AnswerConfig;
use crate::types::{FeedbackTier, QuestionResult};

/// Scorer for keyword coverage and feedback tier
#[derive(Debug, Clone, Default)]
pub struct AnswerScorer {
    config: AnswerConfig,
}

impl AnswerScorer {
    pub fn new(config: AnswerConfig) -> Self {
        Self { config }
    }

    /// Score a transcript against its keyword list.
    ///
    /// Keywords keep their original spelling in the result, so
    /// `keywords_found` and `keywords_missing` partition the input list.
    pub fn evaluate(&self, question_id: &str, transcript: &str, keywords: &[String]) -> QuestionResult {
        if transcript.trim().is_empty() {
            return QuestionResult {
                question_id: question_id.to_string(),
                score: 0,
                keywords_found: Vec::new(),
                keywords_missing: keywords.to_vec(),
                feedback_tier: FeedbackTier::NoAnswer,
                feedback: FeedbackTier::NoAnswer.message().to_string(),
                transcription: transcript.to_string(),
            };
        }

        let haystack = transcript.to_lowercase();
        let (found, missing): (Vec<String>, Vec<String>) = keywords
            .iter()
            .cloned()
            .partition(|kw| haystack.contains(&kw.to_lowercase()));

        let coverage = if keywords.is_empty() {
            0.0
        } else {
            found.len() as f64 / keywords.len() as f64
        };
        let tier = self.tier(coverage);

        QuestionResult {
            question_id: question_id.to_string(),
            score: (coverage * 100.0).round_ties_even().clamp(0.0, 100.0) as u32,
            keywords_found: found,
            keywords_missing: missing,
            feedback_tier: tier,
            feedback: tier.message().to_string(),
            transcription: transcript.to_string(),
        }
    }

    fn tier(&self, coverage: f64) -> FeedbackTier {
        if coverage >= self.config.excellent_threshold {
            FeedbackTier::Excellent
        } else if coverage >= self.config.good_threshold {
            FeedbackTier::Good
        } else {
            FeedbackTier::NeedsReview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_empty_transcript_short_circuits() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["ownership", "borrowing"]);
        let result = scorer.evaluate("q1", "", &kws);
        assert_eq!(result.score, 0);
        assert_eq!(result.keywords_missing, kws);
        assert!(result.keywords_found.is_empty());
        assert_eq!(result.feedback_tier, FeedbackTier::NoAnswer);
        assert_eq!(result.feedback, "No answer detected");
    }

    #[test]
    fn test_case_insensitive_substring() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["REST", "Http", "cache"]);
        let result = scorer.evaluate("q1", "A restful api over HTTP behind a cache", &kws);
        assert_eq!(result.keywords_found, keywords(&["REST", "Http", "cache"]));
        assert_eq!(result.score, 100);
        assert_eq!(result.feedback_tier, FeedbackTier::Excellent);
    }

    #[test]
    fn test_found_and_missing_partition_keywords() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["stack", "heap", "lifetime", "trait", "borrow"]);
        let result = scorer.evaluate("q2", "the stack and the heap, plus a borrow", &kws);

        let mut union: Vec<String> = result
            .keywords_found
            .iter()
            .chain(result.keywords_missing.iter())
            .cloned()
            .collect();
        union.sort();
        let mut expected = kws.clone();
        expected.sort();
        assert_eq!(union, expected);
        assert!(result
            .keywords_found
            .iter()
            .all(|k| !result.keywords_missing.contains(k)));
        assert_eq!(result.score, 60);
        assert_eq!(result.feedback_tier, FeedbackTier::Good);
    }

    #[test]
    fn test_low_coverage_tier() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["mutex", "channel", "atomic"]);
        let result = scorer.evaluate("q3", "I would use a channel", &kws);
        assert_eq!(result.score, 33);
        assert_eq!(result.feedback_tier, FeedbackTier::NeedsReview);
    }

    #[test]
    fn test_half_percent_rounds_to_even() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["a1", "b2", "c3", "d4", "e5", "f6", "g7", "h8"]);
        // 1 of 8 keywords = 12.5%
        let result = scorer.evaluate("q4", "only a1 here", &kws);
        assert_eq!(result.score, 12);
    }

    #[test]
    fn test_deterministic() {
        let scorer = AnswerScorer::default();
        let kws = keywords(&["index", "query"]);
        let a = scorer.evaluate("q5", "An index speeds up the query", &kws);
        let b = scorer.evaluate("q5", "An index speeds up the query", &kws);
        assert_eq!(a, b);
    }
}
