//! Reports flowing from the audio engine back into the player
//!
//! The engine is a push-only source: it never answers queries, it just
//! reports status transitions and periodic telemetry. Both kinds of report
//! enter the player through the same serialized inbox as user commands.

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by an audio engine.
///
/// `Errored` carries a human-readable reason straight from the engine; the
/// player forwards it verbatim and never tries to classify it further.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum EngineStatus {
    /// No item attached
    Idle,
    /// Item attached, buffering toward playable
    Loading,
    /// Buffered enough to begin playback
    ReadyToPlay,
    /// Engine is rendering audio
    Playing,
    /// Engine holds position without rendering
    Paused,
    /// Playback reached the end of the track
    Finished,
    /// Playback failed
    Errored { reason: String },
}

impl std::fmt::Display for EngineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineStatus::Idle => write!(f, "idle"),
            EngineStatus::Loading => write!(f, "loading"),
            EngineStatus::ReadyToPlay => write!(f, "ready"),
            EngineStatus::Playing => write!(f, "playing"),
            EngineStatus::Paused => write!(f, "paused"),
            EngineStatus::Finished => write!(f, "finished"),
            EngineStatus::Errored { reason } => write!(f, "errored: {}", reason),
        }
    }
}

/// One progress observation from the engine.
///
/// Raw engine units: seconds for position and duration, 0-100 for the
/// buffered percentage. Projection into display form happens downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySample {
    /// Playback position in seconds
    pub current_seconds: f64,
    /// Track duration in seconds
    pub total_seconds: f64,
    /// Buffered amount as a percentage, 0.0 to 100.0
    pub buffered_percent: f64,
}
