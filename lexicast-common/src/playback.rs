//! Playback state snapshot types
//!
//! `PlaybackState` is owned and mutated by exactly one writer (the player's
//! reducer task); everything else receives cloned snapshots.

use serde::{Deserialize, Serialize};

/// Address of an audio track, as resolved by an episode source.
///
/// Equality drives both the idempotent-reload guard and the stale-telemetry
/// guard, so the string is kept exactly as given (no normalization).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioUrl(String);

impl AudioUrl {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AudioUrl {
    fn from(url: &str) -> Self {
        Self(url.to_string())
    }
}

impl From<String> for AudioUrl {
    fn from(url: String) -> Self {
        Self(url)
    }
}

impl std::fmt::Display for AudioUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Discriminant of the playback state machine.
///
/// `Finished` is a loaded state: the track URL stays in place and a toggle
/// resumes playback from wherever the engine lands.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackPhase {
    /// No track loaded yet
    Unloaded,
    /// Track loaded, not playing
    Paused,
    /// Track loaded and playing
    Playing,
    /// Track played to its end
    Finished,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackPhase::Unloaded => write!(f, "unloaded"),
            PlaybackPhase::Paused => write!(f, "paused"),
            PlaybackPhase::Playing => write!(f, "playing"),
            PlaybackPhase::Finished => write!(f, "finished"),
        }
    }
}

/// Authoritative playback state snapshot.
///
/// Invariants maintained by the reducer:
/// - `phase == Playing` implies `loaded_url` is set
/// - `phase == Unloaded` implies `loaded_url` is not set
/// - `speed` is positive and only changes while playing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    /// URL of the currently loaded track, if any
    pub loaded_url: Option<AudioUrl>,
    /// State machine discriminant
    pub phase: PlaybackPhase,
    /// Current playback rate (1.0 = normal speed)
    pub speed: f64,
}

impl PlaybackState {
    /// State of a freshly created controller: nothing loaded, not playing.
    pub fn initial(default_speed: f64) -> Self {
        Self {
            loaded_url: None,
            phase: PlaybackPhase::Unloaded,
            speed: default_speed,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_url.is_some()
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = PlaybackState::initial(1.0);
        assert_eq!(state.loaded_url, None);
        assert_eq!(state.phase, PlaybackPhase::Unloaded);
        assert_eq!(state.speed, 1.0);
        assert!(!state.is_loaded());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_phase_accessors() {
        let mut state = PlaybackState::initial(1.0);
        state.loaded_url = Some(AudioUrl::from("https://example.org/ep-190815.mp3"));

        state.phase = PlaybackPhase::Paused;
        assert!(state.is_loaded());
        assert!(!state.is_playing());

        state.phase = PlaybackPhase::Playing;
        assert!(state.is_playing());

        state.phase = PlaybackPhase::Finished;
        assert!(state.is_loaded());
        assert!(!state.is_playing());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(PlaybackPhase::Unloaded.to_string(), "unloaded");
        assert_eq!(PlaybackPhase::Paused.to_string(), "paused");
        assert_eq!(PlaybackPhase::Playing.to_string(), "playing");
        assert_eq!(PlaybackPhase::Finished.to_string(), "finished");
    }

    #[test]
    fn test_audio_url_equality() {
        let a = AudioUrl::from("https://example.org/a.mp3");
        let b = AudioUrl::new("https://example.org/a.mp3".to_string());
        let c = AudioUrl::from("https://example.org/c.mp3");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "https://example.org/a.mp3");
    }

    #[test]
    fn test_audio_url_serializes_as_plain_string() {
        let url = AudioUrl::from("https://example.org/a.mp3");
        let json = serde_json::to_string(&url).expect("serialize");
        assert_eq!(json, "\"https://example.org/a.mp3\"");
    }
}
