//! Playback reducer
//!
//! The single writer of playback state. Every user command and engine report
//! lands in one inbox and is applied here in arrival order, so there is never
//! a second participant to race against: no locks, no torn updates, no
//! command interleaving with telemetry.
//!
//! Effects flow outward three ways: fire-and-forget calls into the engine,
//! snapshot publications over watch channels, and events over the bus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use lexicast_common::{
    AudioUrl, DerivedSignals, EngineStatus, EventBus, PlaybackCommand, PlaybackPhase,
    PlaybackState, PlayerEvent,
};

use crate::engine::{AudioEngine, Input, TelemetryFrame};
use crate::gate::{GateDecision, SpeedGate};
use crate::projector::project;

pub(crate) struct Reducer {
    state: PlaybackState,
    engine: Arc<dyn AudioEngine>,
    gate: SpeedGate,
    /// Load generation, shared with every EngineSink clone
    generation: Arc<AtomicU64>,
    /// Whether the Ready event already fired for the current load
    ready_emitted: bool,
    state_tx: watch::Sender<PlaybackState>,
    signals_tx: watch::Sender<DerivedSignals>,
    bus: EventBus,
}

impl Reducer {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        state: PlaybackState,
        engine: Arc<dyn AudioEngine>,
        gate: SpeedGate,
        generation: Arc<AtomicU64>,
        state_tx: watch::Sender<PlaybackState>,
        signals_tx: watch::Sender<DerivedSignals>,
        bus: EventBus,
    ) -> Self {
        Self {
            state,
            engine,
            gate,
            generation,
            ready_emitted: false,
            state_tx,
            signals_tx,
            bus,
        }
    }

    /// Drain the inbox until every sender is gone, then exit.
    pub(crate) async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Input>) {
        debug!("Playback reducer started");
        while let Some(input) = inbox.recv().await {
            self.apply(input);
        }
        debug!("Playback reducer stopped");
    }

    /// Apply one input. Synchronous on purpose: the reducer never awaits
    /// mid-update, so each input is fully applied before the next one.
    fn apply(&mut self, input: Input) {
        match input {
            Input::Command(command) => self.apply_command(command),
            Input::Status(status) => self.apply_status(status),
            Input::Telemetry(frame) => self.apply_telemetry(frame),
        }
    }

    // ---- Commands ----

    fn apply_command(&mut self, command: PlaybackCommand) {
        debug!("Command received: {}", command.kind());
        match command {
            PlaybackCommand::LoadAudio { url } => self.load_audio(url),
            PlaybackCommand::TogglePlayPause => self.toggle_play_pause(),
            PlaybackCommand::Seek { fraction } => self.seek(fraction),
            PlaybackCommand::SetSpeed { rate } => self.forward_speed(rate),
            PlaybackCommand::AdjustSpeed { delta } => {
                self.forward_speed(self.state.speed + delta)
            }
            PlaybackCommand::Skip { delta_seconds } => self.skip(delta_seconds),
        }
    }

    fn load_audio(&mut self, url: AudioUrl) {
        if self.state.loaded_url.as_ref() == Some(&url) {
            debug!("Track already loaded, ignoring reload: {}", url);
            return;
        }
        info!("Loading track: {}", url);

        // Bump the generation before touching the engine so every report the
        // new load produces carries the new stamp, and in-flight reports for
        // the old track go stale.
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.ready_emitted = false;
        self.engine.load(&url);
        self.state.loaded_url = Some(url);
        self.transition(PlaybackPhase::Paused);
    }

    fn toggle_play_pause(&mut self) {
        match self.state.phase {
            PlaybackPhase::Unloaded => {
                debug!("Toggle ignored: no track loaded");
            }
            PlaybackPhase::Paused | PlaybackPhase::Finished => {
                info!("Play command received");
                self.engine.play();
                self.transition(PlaybackPhase::Playing);
            }
            PlaybackPhase::Playing => {
                info!("Pause command received");
                self.engine.pause();
                self.transition(PlaybackPhase::Paused);
            }
        }
    }

    fn seek(&mut self, fraction: f64) {
        if !self.state.is_loaded() {
            debug!("Seek ignored: no track loaded");
            return;
        }
        if !fraction.is_finite() {
            warn!("Seek rejected: fraction is not finite");
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        debug!("Seeking to fraction {:.3}", fraction);
        self.engine.seek(fraction);
    }

    fn forward_speed(&mut self, rate: f64) {
        match self.gate.evaluate(self.state.is_playing(), rate) {
            GateDecision::Forward(rate) => {
                self.engine.set_speed(rate);
                self.state.speed = rate;
                self.publish_state();
                info!("Playback rate set to {:.2}", rate);
            }
            GateDecision::DroppedPaused => {
                debug!("Speed change dropped: playback not active");
            }
            GateDecision::DroppedMalformed => {
                warn!("Speed change dropped: invalid rate {}", rate);
            }
        }
    }

    fn skip(&mut self, delta_seconds: f64) {
        if !self.state.is_loaded() {
            debug!("Skip ignored: no track loaded");
            return;
        }
        if !delta_seconds.is_finite() {
            warn!("Skip rejected: offset is not finite");
            return;
        }
        debug!("Skipping {:+.1}s", delta_seconds);
        self.engine.skip(delta_seconds);
    }

    // ---- Engine status reports ----

    fn apply_status(&mut self, status: EngineStatus) {
        match status {
            EngineStatus::ReadyToPlay => self.track_ready(),
            EngineStatus::Finished => self.track_finished(),
            EngineStatus::Errored { reason } => self.track_errored(reason),
            // Informational only. Play/pause state is owned by this reducer,
            // not echoed back from the engine.
            EngineStatus::Idle
            | EngineStatus::Loading
            | EngineStatus::Playing
            | EngineStatus::Paused => {
                debug!("Engine status: {}", status);
            }
        }
    }

    fn track_ready(&mut self) {
        let Some(url) = self.state.loaded_url.clone() else {
            debug!("Ready status with no track loaded");
            return;
        };
        if self.ready_emitted {
            debug!("Ready status repeated for {}", url);
            return;
        }
        self.ready_emitted = true;
        info!("Track ready: {}", url);
        self.bus.emit_lossy(PlayerEvent::Ready {
            url,
            timestamp: chrono::Utc::now(),
        });
    }

    fn track_finished(&mut self) {
        let Some(url) = self.state.loaded_url.clone() else {
            debug!("Finished status with no track loaded");
            return;
        };
        if self.state.phase == PlaybackPhase::Finished {
            debug!("Finished status repeated for {}", url);
            return;
        }
        info!("Track finished: {}", url);
        self.bus.emit_lossy(PlayerEvent::TrackFinished {
            url,
            timestamp: chrono::Utc::now(),
        });
        self.transition(PlaybackPhase::Finished);
    }

    fn track_errored(&mut self, reason: String) {
        if !self.state.is_loaded() {
            warn!("Engine error with no track loaded: {}", reason);
            return;
        }
        error!("Playback failed: {}", reason);
        self.bus.emit_lossy(PlayerEvent::PlaybackError {
            message: reason,
            timestamp: chrono::Utc::now(),
        });
        // The track stays loaded; a toggle retries from the engine's last
        // position.
        self.transition(PlaybackPhase::Paused);
    }

    // ---- Engine telemetry ----

    fn apply_telemetry(&mut self, frame: TelemetryFrame) {
        let current = self.generation.load(Ordering::Acquire);
        if frame.generation != current {
            debug!(
                "Discarding stale telemetry (generation {}, current {})",
                frame.generation, current
            );
            return;
        }
        if self.state.loaded_url.as_ref() != Some(&frame.url) {
            debug!("Discarding telemetry for unloaded track: {}", frame.url);
            return;
        }
        self.signals_tx
            .send_replace(project(&frame.sample, &self.state));
    }

    // ---- State publication ----

    fn transition(&mut self, next: PlaybackPhase) {
        let previous = self.state.phase;
        self.state.phase = next;
        self.publish_state();
        if previous != next {
            info!("Playback state changed: {} -> {}", previous, next);
            self.bus.emit_lossy(PlayerEvent::StateChanged {
                previous,
                current: next,
                state: self.state.clone(),
                timestamp: chrono::Utc::now(),
            });
        }
    }

    fn publish_state(&self) {
        debug_assert!(
            !self.state.is_playing() || self.state.is_loaded(),
            "playing without a loaded track"
        );
        self.state_tx.send_replace(self.state.clone());
    }
}
