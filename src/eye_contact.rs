//! Eye-contact aggregation
//!
//! This module reduces a video's frame stream into an eye-contact percentage
//! and averages the per-video percentages into a candidate-level score.

use crate::config::EyeTrackingConfig;
use crate::gaze::GazeClassifier;
use crate::stability::StabilityDebouncer;
use crate::types::{round_to, EyeContactEntry, FrameInput};
use log::debug;
use serde::{Deserialize, Serialize};

/// Eye-contact summary for one video
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VideoEyeContact {
    pub total_frames: usize,
    pub eye_contact_frames: usize,
    /// Percentage of frames with eye contact (two decimals)
    pub percentage: f64,
}

impl VideoEyeContact {
    /// Video yielded no frames at all
    pub fn is_degenerate(&self) -> bool {
        self.total_frames == 0
    }
}

/// Percentage of `true` samples, rounded to two decimals; 0.0 for no samples
pub fn eye_contact_percentage<I>(samples: I) -> f64
where
    I: IntoIterator<Item = bool>,
{
    let (total, hits) = samples
        .into_iter()
        .fold((0usize, 0usize), |(total, hits), s| (total + 1, hits + s as usize));
    ratio_pct(hits, total)
}

fn ratio_pct(hits: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(hits as f64 / total as f64 * 100.0, 2)
}

/// Arithmetic mean of per-video percentages, rounded to two decimals
pub fn candidate_eye_contact(per_video: &[f64]) -> f64 {
    if per_video.is_empty() {
        return 0.0;
    }
    round_to(per_video.iter().sum::<f64>() / per_video.len() as f64, 2)
}

/// Per-question breakdown with whole-percent display strings
pub fn breakdown(question_ids: &[String], per_video: &[f64]) -> Vec<EyeContactEntry> {
    question_ids
        .iter()
        .zip(per_video)
        .map(|(id, pct)| EyeContactEntry {
            question: id.clone(),
            score: format!("{pct:.0}%"),
        })
        .collect()
}

/// Aggregator running the debouncer over one video at a time
pub struct EyeContactAggregator {
    classifier: GazeClassifier,
    config: EyeTrackingConfig,
}

impl Default for EyeContactAggregator {
    fn default() -> Self {
        Self::new(EyeTrackingConfig::default())
    }
}

impl EyeContactAggregator {
    pub fn new(config: EyeTrackingConfig) -> Self {
        Self {
            classifier: GazeClassifier::from_config(&config),
            config,
        }
    }

    /// Score one video's frames with freshly reset stability windows
    pub fn score_video(&self, frames: &[FrameInput]) -> VideoEyeContact {
        let mut debouncer = StabilityDebouncer::from_config(&self.config);
        let mut eye_contact_frames = 0usize;

        for frame in frames {
            let contact = match frame {
                FrameInput::Observation(obs) => debouncer.observe(*obs).eye_contact(),
                FrameInput::Landmarks(reading) => {
                    debouncer.observe(self.classifier.classify(reading)).eye_contact()
                }
                // No face: counted, but the windows keep their history
                FrameInput::NoFace => false,
            };
            if contact {
                eye_contact_frames += 1;
            }
        }

        let summary = VideoEyeContact {
            total_frames: frames.len(),
            eye_contact_frames,
            percentage: ratio_pct(eye_contact_frames, frames.len()),
        };
        debug!(
            "eye contact {}/{} frames ({:.2}%)",
            summary.eye_contact_frames, summary.total_frames, summary.percentage
        );
        summary
    }
}
