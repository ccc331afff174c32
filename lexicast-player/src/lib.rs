//! # Lexicast Player Library (lexicast-player)
//!
//! Reactive playback controller for spoken-audio tracks.
//!
//! **Purpose:** Serialize user commands and audio engine reports into one
//! ordered stream, hold the authoritative playback state, and publish
//! display-ready progress signals and player events.
//!
//! **Architecture:** Single reducer task over a tokio mpsc inbox; engines are
//! fire-and-forget command sinks that report back through the same inbox.

pub mod controller;
pub mod engine;
pub mod error;
pub mod gate;
pub mod projector;
pub mod reducer;
pub mod source;

pub use controller::PlayerController;
pub use engine::{AudioEngine, EngineSink, SimulatedEngine, SimulatorOptions, TelemetryFrame};
pub use error::{Error, Result};
pub use source::{EpisodeSource, SourceError};
