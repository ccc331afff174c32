//! Player controller
//!
//! Public face of the player. Owns the reducer task and the strong end of
//! its inbox, accepts commands, and hands out state, signal, and event
//! subscriptions. Dropping the controller (or calling [`shutdown`])
//! closes the inbox and lets the reducer drain and exit.
//!
//! [`shutdown`]: PlayerController::shutdown

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use lexicast_common::{
    AudioUrl, DerivedSignals, EventBus, PlaybackCommand, PlaybackState, PlayerConfig, PlayerEvent,
};

use crate::engine::{AudioEngine, EngineSink, Input};
use crate::error::{Error, Result};
use crate::gate::SpeedGate;
use crate::reducer::Reducer;
use crate::source::EpisodeSource;

/// Handle to a running player.
///
/// Cheap to share by reference; commands go through `&self`. The handle is
/// deliberately not `Clone`: whoever owns it owns the player's lifetime.
pub struct PlayerController {
    inbox_tx: mpsc::UnboundedSender<Input>,
    state_rx: watch::Receiver<PlaybackState>,
    signals_rx: watch::Receiver<DerivedSignals>,
    bus: EventBus,
    config: PlayerConfig,
    task: JoinHandle<()>,
}

impl PlayerController {
    /// Start a player over the engine built by `engine_factory`.
    ///
    /// The factory receives the [`EngineSink`] the engine reports through;
    /// the controller keeps the engine alive for the reducer's lifetime.
    /// Must be called within a tokio runtime.
    pub fn spawn<F>(config: PlayerConfig, engine_factory: F) -> Self
    where
        F: FnOnce(EngineSink) -> Arc<dyn AudioEngine>,
    {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let generation = Arc::new(AtomicU64::new(0));
        // Weak sender: a sink held by a parked engine must not hold the
        // inbox open after the controller is gone.
        let sink = EngineSink::new(inbox_tx.downgrade(), Arc::clone(&generation));
        let engine = engine_factory(sink);

        let initial = PlaybackState::initial(config.default_speed);
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let (signals_tx, signals_rx) =
            watch::channel(DerivedSignals::initial(config.default_speed));
        let bus = EventBus::new(config.event_capacity);

        let reducer = Reducer::new(
            initial,
            engine,
            SpeedGate::new(config.speed_min, config.speed_max),
            generation,
            state_tx,
            signals_tx,
            bus.clone(),
        );
        let task = tokio::spawn(reducer.run(inbox_rx));
        info!("Player controller started");

        Self {
            inbox_tx,
            state_rx,
            signals_rx,
            bus,
            config,
            task,
        }
    }

    /// Queue a command for the reducer.
    pub fn submit(&self, command: PlaybackCommand) -> Result<()> {
        self.inbox_tx
            .send(Input::Command(command))
            .map_err(|_| Error::ControllerClosed)
    }

    /// Attach a track. Reloading the currently loaded URL is a no-op.
    pub fn load_audio(&self, url: impl Into<AudioUrl>) -> Result<()> {
        self.submit(PlaybackCommand::LoadAudio { url: url.into() })
    }

    /// Flip between playing and paused.
    pub fn toggle_play_pause(&self) -> Result<()> {
        self.submit(PlaybackCommand::TogglePlayPause)
    }

    /// Jump to a fraction of the track duration.
    pub fn seek(&self, fraction: f64) -> Result<()> {
        self.submit(PlaybackCommand::Seek { fraction })
    }

    /// Set the playback rate. Applied only while playing.
    pub fn set_speed(&self, rate: f64) -> Result<()> {
        self.submit(PlaybackCommand::SetSpeed { rate })
    }

    /// Nudge the playback rate. Applied only while playing.
    pub fn adjust_speed(&self, delta: f64) -> Result<()> {
        self.submit(PlaybackCommand::AdjustSpeed { delta })
    }

    /// Jump forward by the configured skip step.
    pub fn skip_forward(&self) -> Result<()> {
        self.submit(PlaybackCommand::Skip {
            delta_seconds: self.config.skip_step_seconds,
        })
    }

    /// Jump backward by the configured skip step.
    pub fn skip_backward(&self) -> Result<()> {
        self.submit(PlaybackCommand::Skip {
            delta_seconds: -self.config.skip_step_seconds,
        })
    }

    /// Resolve an episode through `source` and load its audio track.
    ///
    /// On failure the error is also announced on the event bus, so surfaces
    /// that only watch events still see it.
    pub async fn load_episode<S: EpisodeSource>(
        &self,
        source: &S,
        episode_id: &str,
    ) -> Result<AudioUrl> {
        info!("Resolving episode: {}", episode_id);
        match source.fetch_audio_url(episode_id).await {
            Ok(url) => {
                self.load_audio(url.clone())?;
                Ok(url)
            }
            Err(err) => {
                warn!("Episode resolution failed: {}", err);
                self.bus.emit_lossy(PlayerEvent::PlaybackError {
                    message: err.to_string(),
                    timestamp: chrono::Utc::now(),
                });
                Err(Error::Source(err))
            }
        }
    }

    /// Watch playback state snapshots.
    pub fn observe_state(&self) -> watch::Receiver<PlaybackState> {
        self.state_rx.clone()
    }

    /// Latest playback state snapshot.
    pub fn current_state(&self) -> PlaybackState {
        self.state_rx.borrow().clone()
    }

    /// Watch display-ready progress frames.
    pub fn observe_signals(&self) -> watch::Receiver<DerivedSignals> {
        self.signals_rx.clone()
    }

    /// Latest display-ready progress frame.
    pub fn current_signals(&self) -> DerivedSignals {
        self.signals_rx.borrow().clone()
    }

    /// Subscribe to player events.
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.bus.subscribe()
    }

    /// The configuration this player runs under.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Close the inbox and wait for the reducer to drain and exit.
    ///
    /// Inputs already queued are still applied. Engine reports pushed after
    /// the inbox closes are dropped by their sinks.
    pub async fn shutdown(self) {
        info!("Player controller shutting down");
        let Self { inbox_tx, task, .. } = self;
        drop(inbox_tx);
        if let Err(err) = task.await {
            warn!("Playback reducer task ended abnormally: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;
    use lexicast_common::EngineStatus;
    use std::time::Duration;

    struct NullEngine;

    impl AudioEngine for NullEngine {
        fn load(&self, _url: &AudioUrl) {}
        fn play(&self) {}
        fn pause(&self) {}
        fn seek(&self, _fraction: f64) {}
        fn set_speed(&self, _rate: f64) {}
        fn skip(&self, _delta_seconds: f64) {}
    }

    /// Keeps its sink parked inside the reducer-owned engine and pushes
    /// through it on load, mimicking an engine with its own task.
    struct EchoEngine {
        sink: EngineSink,
    }

    impl AudioEngine for EchoEngine {
        fn load(&self, _url: &AudioUrl) {
            self.sink.status(EngineStatus::Loading);
        }
        fn play(&self) {}
        fn pause(&self) {}
        fn seek(&self, _fraction: f64) {}
        fn set_speed(&self, _rate: f64) {}
        fn skip(&self, _delta_seconds: f64) {}
    }

    struct FailingSource;

    impl EpisodeSource for FailingSource {
        async fn fetch_audio_url(
            &self,
            _episode_id: &str,
        ) -> std::result::Result<AudioUrl, SourceError> {
            Err(SourceError::Network("catalog unreachable".to_string()))
        }
    }

    fn null_controller() -> PlayerController {
        PlayerController::spawn(PlayerConfig::default(), |_sink| {
            Arc::new(NullEngine) as Arc<dyn AudioEngine>
        })
    }

    #[tokio::test]
    async fn test_initial_snapshots() {
        let controller = null_controller();

        let state = controller.current_state();
        assert!(!state.is_loaded());
        assert!(!state.is_playing());
        assert_eq!(state.speed, 1.0);
        assert_eq!(controller.current_signals().current_time_text, "00:00");

        controller.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_completes_with_parked_sink() {
        let controller = PlayerController::spawn(PlayerConfig::default(), |sink| {
            Arc::new(EchoEngine { sink }) as Arc<dyn AudioEngine>
        });
        controller
            .load_audio("https://example.org/a.mp3")
            .expect("submit");

        tokio::time::timeout(Duration::from_secs(2), controller.shutdown())
            .await
            .expect("shutdown must not hang");
    }

    #[tokio::test]
    async fn test_load_episode_failure_emits_error_event() {
        let controller = null_controller();
        let mut events = controller.subscribe_events();

        let err = controller
            .load_episode(&FailingSource, "ep-9")
            .await
            .expect_err("resolution must fail");
        assert!(matches!(err, Error::Source(SourceError::Network(_))));

        let event = tokio::time::timeout(Duration::from_secs(1), events.recv())
            .await
            .expect("event within deadline")
            .expect("bus open");
        match event {
            PlayerEvent::PlaybackError { message, .. } => {
                assert!(message.contains("catalog unreachable"));
            }
            other => panic!("unexpected event: {:?}", other),
        }

        // Nothing was loaded
        assert!(!controller.current_state().is_loaded());
        controller.shutdown().await;
    }
}
