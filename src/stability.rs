//! Stability debouncing
//!
//! This module turns noisy per-frame eye-openness and gaze booleans into
//! debounced signals. Each channel keeps a fixed-capacity ring buffer of its
//! most recent observations; a channel reads as stable-true only once the
//! buffer is full and every slot holds `true`.

use crate::config::EyeTrackingConfig;
use crate::types::FrameObservation;
use serde::{Deserialize, Serialize};

/// Debounce state of one tracked channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelState {
    /// Fewer observations than the window capacity have been seen
    AwaitingFullWindow,
    /// Window is full and every observation is `true`
    StableTrue,
    /// Window is full and at least one observation is `false`
    StableFalse,
}

/// Fixed-capacity ring buffer of boolean observations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityWindow {
    slots: Vec<bool>,
    /// Index the next observation is written to
    head: usize,
    len: usize,
}

impl StabilityWindow {
    /// Create an empty window; a zero capacity is raised to one
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![false; capacity.max(1)],
            head: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.slots.len()
    }

    /// Push an observation, evicting the oldest once full
    pub fn push(&mut self, value: bool) {
        self.slots[self.head] = value;
        self.head = (self.head + 1) % self.slots.len();
        if self.len < self.slots.len() {
            self.len += 1;
        }
    }

    /// Most recently pushed observation
    pub fn newest(&self) -> Option<bool> {
        if self.len == 0 {
            return None;
        }
        let cap = self.slots.len();
        Some(self.slots[(self.head + cap - 1) % cap])
    }

    /// Held observations, oldest first
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        let cap = self.slots.len();
        let start = (self.head + cap - self.len) % cap;
        (0..self.len).map(move |i| self.slots[(start + i) % cap])
    }

    pub fn state(&self) -> ChannelState {
        if !self.is_full() {
            ChannelState::AwaitingFullWindow
        } else if self.iter().all(|v| v) {
            ChannelState::StableTrue
        } else {
            ChannelState::StableFalse
        }
    }

    /// Debounced reading: full window, all observations true
    pub fn is_stable_true(&self) -> bool {
        self.state() == ChannelState::StableTrue
    }

    pub fn reset(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}

/// Debounced readings for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableReading {
    pub eyes_open: bool,
    pub gaze_on_camera: bool,
}

impl StableReading {
    /// Eye-contact sample for the frame
    pub fn eye_contact(&self) -> bool {
        self.eyes_open && self.gaze_on_camera
    }
}

/// Two-channel stability debouncer for one video stream
#[derive(Debug, Clone)]
pub struct StabilityDebouncer {
    eye: StabilityWindow,
    gaze: StabilityWindow,
}

impl Default for StabilityDebouncer {
    fn default() -> Self {
        Self::from_config(&EyeTrackingConfig::default())
    }
}

impl StabilityDebouncer {
    pub fn new(eye_window: usize, gaze_window: usize) -> Self {
        Self {
            eye: StabilityWindow::new(eye_window),
            gaze: StabilityWindow::new(gaze_window),
        }
    }

    pub fn from_config(config: &EyeTrackingConfig) -> Self {
        Self::new(config.eye_window, config.gaze_window)
    }

    /// Feed one frame and return the debounced readings for it
    pub fn observe(&mut self, observation: FrameObservation) -> StableReading {
        self.eye.push(observation.eyes_open);
        self.gaze.push(observation.gaze_on_camera);
        self.reading()
    }

    /// Debounced readings without consuming a frame
    pub fn reading(&self) -> StableReading {
        StableReading {
            eyes_open: self.eye.is_stable_true(),
            gaze_on_camera: self.gaze.is_stable_true(),
        }
    }

    pub fn eye_state(&self) -> ChannelState {
        self.eye.state()
    }

    pub fn gaze_state(&self) -> ChannelState {
        self.gaze.state()
    }

    /// Return both channels to `AwaitingFullWindow` (start of a new video)
    pub fn reset(&mut self) {
        self.eye.reset();
        self.gaze.reset();
    }
}
