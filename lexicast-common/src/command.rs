//! User-facing playback commands
//!
//! Every command enters the player through one ordered queue and is applied
//! by a single reducer, so command handling never races with engine reports.

use serde::{Deserialize, Serialize};

use crate::playback::AudioUrl;

/// A request from the user surface to the player.
///
/// Commands are fire-and-forget: validation and drops happen inside the
/// reducer, and outcomes surface through state snapshots and player events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlaybackCommand {
    /// Flip between playing and paused; ignored when nothing is loaded
    TogglePlayPause,
    /// Attach a track; reloading the already-loaded URL is a no-op
    LoadAudio { url: AudioUrl },
    /// Jump to a fraction of the track duration, clamped to [0.0, 1.0]
    Seek { fraction: f64 },
    /// Set the playback rate; only applied while playing
    SetSpeed { rate: f64 },
    /// Nudge the playback rate by a delta; only applied while playing
    AdjustSpeed { delta: f64 },
    /// Jump relative to the current position, in seconds
    Skip { delta_seconds: f64 },
}

impl PlaybackCommand {
    /// Short label for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            PlaybackCommand::TogglePlayPause => "toggle_play_pause",
            PlaybackCommand::LoadAudio { .. } => "load_audio",
            PlaybackCommand::Seek { .. } => "seek",
            PlaybackCommand::SetSpeed { .. } => "set_speed",
            PlaybackCommand::AdjustSpeed { .. } => "adjust_speed",
            PlaybackCommand::Skip { .. } => "skip",
        }
    }
}
