//! Display-ready projection of playback progress
//!
//! `DerivedSignals` is what a UI binds to directly: formatted timecodes plus
//! unit-interval progress values. It is recomputed from each accepted
//! telemetry sample and published as a whole snapshot, so observers never see
//! a half-updated frame.

use serde::{Deserialize, Serialize};

use crate::timecode::format_mm_ss;

/// One display-ready frame of playback progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedSignals {
    /// Playback position as `MM:SS`
    pub current_time_text: String,
    /// Track duration as `MM:SS`
    pub total_time_text: String,
    /// Playback position in seconds
    pub current_seconds: f64,
    /// Track duration in seconds
    pub total_seconds: f64,
    /// Buffered amount in [0.0, 1.0], ready for a progress bar
    pub buffered_fraction: f64,
    /// Playback rate the frame was produced under
    pub speed: f64,
}

impl DerivedSignals {
    /// Frame shown before any telemetry has arrived: zero progress.
    pub fn initial(speed: f64) -> Self {
        Self {
            current_time_text: format_mm_ss(0.0),
            total_time_text: format_mm_ss(0.0),
            current_seconds: 0.0,
            total_seconds: 0.0,
            buffered_fraction: 0.0,
            speed,
        }
    }
}
