//! # Lexicast Common Library
//!
//! Shared vocabulary for the lexicast playback controller:
//! - Playback commands and state snapshots
//! - Engine status and telemetry types
//! - Derived presentation signals and time formatting
//! - Event types (PlayerEvent enum) and the event bus
//! - Configuration loading

pub mod command;
pub mod config;
pub mod error;
pub mod events;
pub mod playback;
pub mod signals;
pub mod status;
pub mod timecode;

pub use command::PlaybackCommand;
pub use config::PlayerConfig;
pub use error::{Error, Result};
pub use events::{EventBus, PlayerEvent};
pub use playback::{AudioUrl, PlaybackPhase, PlaybackState};
pub use signals::DerivedSignals;
pub use status::{EngineStatus, TelemetrySample};
