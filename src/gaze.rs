//! Gaze geometry
//!
//! This module converts landmark-provider output (head pose and eye aspect
//! ratios) into the raw per-frame booleans consumed by the debouncer.
//! - Eyes count as open when both aspect ratios exceed the openness threshold
//! - Gaze counts as on-camera when yaw, pitch and roll are inside their limits

use crate::config::EyeTrackingConfig;
use crate::types::{FrameObservation, LandmarkReading};

/// Classifier for raw eye-state and gaze booleans
#[derive(Debug, Clone)]
pub struct GazeClassifier {
    min_eye_openness: f64,
    max_yaw: f64,
    max_pitch: f64,
    max_roll: f64,
}

impl Default for GazeClassifier {
    fn default() -> Self {
        Self::from_config(&EyeTrackingConfig::default())
    }
}

impl GazeClassifier {
    pub fn from_config(config: &EyeTrackingConfig) -> Self {
        Self {
            min_eye_openness: config.min_eye_openness,
            max_yaw: config.max_head_angle,
            max_pitch: config.max_head_angle * config.pitch_factor,
            max_roll: config.max_head_angle * config.roll_factor,
        }
    }

    /// Both eyes open beyond the aspect-ratio threshold
    pub fn eyes_open(&self, left_ear: f64, right_ear: f64) -> bool {
        // NaN compares false, so a missing ratio reads as closed
        left_ear > self.min_eye_openness && right_ear > self.min_eye_openness
    }

    /// Head pose within the on-camera cone
    pub fn looking_at_camera(&self, pitch: f64, yaw: f64, roll: f64) -> bool {
        yaw.abs() < self.max_yaw && pitch.abs() < self.max_pitch && roll.abs() < self.max_roll
    }

    pub fn classify(&self, reading: &LandmarkReading) -> FrameObservation {
        FrameObservation {
            eyes_open: self.eyes_open(reading.left_ear, reading.right_ear),
            gaze_on_camera: self.looking_at_camera(reading.pitch, reading.yaw, reading.roll),
        }
    }
}
