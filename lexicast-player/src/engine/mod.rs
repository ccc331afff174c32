//! Audio engine seam
//!
//! The player drives an engine through the [`AudioEngine`] trait and hears
//! back through an [`EngineSink`]. Both directions are fire-and-forget: trait
//! calls return nothing, and sink pushes are absorbed into the player's inbox
//! where they are serialized with user commands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;

use lexicast_common::{AudioUrl, EngineStatus, PlaybackCommand, TelemetrySample};

mod sim;

pub use sim::{SimulatedEngine, SimulatorOptions};

/// Commands the player issues to an audio engine.
///
/// Calls are fire-and-forget and must not block: an engine queues the work
/// and reports outcomes later through its [`EngineSink`]. The player never
/// reads engine state directly.
pub trait AudioEngine: Send + Sync {
    /// Attach a new track and begin buffering. Playback stays paused until
    /// an explicit play.
    fn load(&self, url: &AudioUrl);

    /// Begin or resume rendering audio.
    fn play(&self);

    /// Stop rendering audio, holding the current position.
    fn pause(&self);

    /// Jump to a fraction of the track duration in [0.0, 1.0].
    fn seek(&self, fraction: f64);

    /// Change the playback rate.
    fn set_speed(&self, rate: f64);

    /// Jump relative to the current position, in seconds. Negative values
    /// move backward.
    fn skip(&self, delta_seconds: f64);
}

/// One telemetry sample tagged with its origin.
///
/// The `url` and `generation` tags let the player discard samples that an
/// engine produced for a track that has since been replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryFrame {
    /// Track the engine was observing
    pub url: AudioUrl,
    /// Load generation current when the sample was pushed
    pub generation: u64,
    /// The raw progress observation
    pub sample: TelemetrySample,
}

/// Everything that can enter the player's inbox.
///
/// User commands and engine reports share one queue, so the reducer sees a
/// single total order and never races one source against another.
#[derive(Debug, Clone)]
pub(crate) enum Input {
    Command(PlaybackCommand),
    Status(EngineStatus),
    Telemetry(TelemetryFrame),
}

/// An engine's handle back into the player.
///
/// Holds a weak sender: once the controller shuts down and the inbox closes,
/// pushes from a still-running engine become silent no-ops instead of keeping
/// the reducer alive.
#[derive(Clone)]
pub struct EngineSink {
    tx: mpsc::WeakUnboundedSender<Input>,
    generation: Arc<AtomicU64>,
}

impl EngineSink {
    pub(crate) fn new(tx: mpsc::WeakUnboundedSender<Input>, generation: Arc<AtomicU64>) -> Self {
        Self { tx, generation }
    }

    /// Report an engine lifecycle status change.
    pub fn status(&self, status: EngineStatus) {
        self.push(Input::Status(status));
    }

    /// Report a progress observation for the given track.
    ///
    /// The frame is stamped with the load generation current at push time, so
    /// a sample raced against a track swap carries the old generation and is
    /// discarded by the reducer.
    pub fn telemetry(&self, url: AudioUrl, sample: TelemetrySample) {
        let generation = self.generation.load(Ordering::Acquire);
        self.push(Input::Telemetry(TelemetryFrame {
            url,
            generation,
            sample,
        }));
    }

    fn push(&self, input: Input) {
        // Inbox already closed means the player shut down; drop the report.
        if let Some(tx) = self.tx.upgrade() {
            let _ = tx.send(input);
        }
    }
}
