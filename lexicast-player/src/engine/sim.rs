//! Simulated audio engine
//!
//! Stands in for a platform audio engine in the demo binary and integration
//! tests. It honors the full engine contract against a virtual track that
//! plays in real time, reporting status and telemetry through its
//! [`EngineSink`](super::EngineSink) like any other engine would.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::debug;

use lexicast_common::{AudioUrl, EngineStatus, TelemetrySample};

use super::{AudioEngine, EngineSink};

/// Tuning for the simulated engine.
#[derive(Debug, Clone)]
pub struct SimulatorOptions {
    /// Virtual track length in seconds, applied to every loaded URL
    pub track_duration: f64,
    /// Wall-clock time between telemetry ticks
    pub tick_interval: Duration,
    /// Buffered percentage gained per tick
    pub buffer_step_percent: f64,
    /// Simulated buffering time between load and ready
    pub load_delay: Duration,
}

impl Default for SimulatorOptions {
    fn default() -> Self {
        Self {
            track_duration: 180.0,
            tick_interval: Duration::from_millis(500),
            buffer_step_percent: 20.0,
            load_delay: Duration::from_millis(50),
        }
    }
}

enum SimCommand {
    Load(AudioUrl),
    Play,
    Pause,
    Seek(f64),
    SetSpeed(f64),
    Skip(f64),
}

/// In-process engine that plays virtual tracks in real time.
pub struct SimulatedEngine {
    cmd_tx: mpsc::UnboundedSender<SimCommand>,
}

impl SimulatedEngine {
    /// Start the simulator task and return its command handle.
    pub fn spawn(sink: EngineSink, options: SimulatorOptions) -> Arc<Self> {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_simulator(sink, options, cmd_rx));
        Arc::new(Self { cmd_tx })
    }

    fn send(&self, command: SimCommand) {
        // Simulator task gone means the runtime is shutting down.
        let _ = self.cmd_tx.send(command);
    }
}

impl AudioEngine for SimulatedEngine {
    fn load(&self, url: &AudioUrl) {
        self.send(SimCommand::Load(url.clone()));
    }

    fn play(&self) {
        self.send(SimCommand::Play);
    }

    fn pause(&self) {
        self.send(SimCommand::Pause);
    }

    fn seek(&self, fraction: f64) {
        self.send(SimCommand::Seek(fraction));
    }

    fn set_speed(&self, rate: f64) {
        self.send(SimCommand::SetSpeed(rate));
    }

    fn skip(&self, delta_seconds: f64) {
        self.send(SimCommand::Skip(delta_seconds));
    }
}

struct VirtualTrack {
    url: AudioUrl,
    position: f64,
    duration: f64,
    buffered_percent: f64,
    finished: bool,
}

impl VirtualTrack {
    fn sample(&self) -> TelemetrySample {
        TelemetrySample {
            current_seconds: self.position,
            total_seconds: self.duration,
            buffered_percent: self.buffered_percent,
        }
    }
}

async fn run_simulator(
    sink: EngineSink,
    options: SimulatorOptions,
    mut cmd_rx: mpsc::UnboundedReceiver<SimCommand>,
) {
    let mut track: Option<VirtualTrack> = None;
    let mut playing = false;
    let mut speed = 1.0_f64;
    let mut ticker = tokio::time::interval(options.tick_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let ticking = playing && track.as_ref().is_some_and(|t| !t.finished);
        let command = if ticking {
            tokio::select! {
                command = cmd_rx.recv() => match command {
                    Some(command) => Some(command),
                    None => break,
                },
                _ = ticker.tick() => None,
            }
        } else {
            // Nothing advances while paused; just wait for a command.
            match cmd_rx.recv().await {
                Some(command) => Some(command),
                None => break,
            }
        };

        match command {
            Some(SimCommand::Load(url)) => {
                debug!("Simulator loading track: {}", url);
                playing = false;
                sink.status(EngineStatus::Loading);
                tokio::time::sleep(options.load_delay).await;

                let loaded = VirtualTrack {
                    url,
                    position: 0.0,
                    duration: options.track_duration,
                    buffered_percent: options.buffer_step_percent.min(100.0),
                    finished: false,
                };
                // A freshly loaded track sits ready but paused until the
                // player asks for playback.
                sink.status(EngineStatus::ReadyToPlay);
                sink.status(EngineStatus::Paused);
                sink.telemetry(loaded.url.clone(), loaded.sample());
                track = Some(loaded);
                ticker.reset();
            }
            Some(SimCommand::Play) => {
                let Some(track) = track.as_mut() else {
                    debug!("Simulator asked to play with no track loaded");
                    continue;
                };
                if track.finished {
                    // Replaying a finished track starts over.
                    track.position = 0.0;
                    track.finished = false;
                }
                playing = true;
                ticker.reset();
                sink.status(EngineStatus::Playing);
                sink.telemetry(track.url.clone(), track.sample());
            }
            Some(SimCommand::Pause) => {
                playing = false;
                sink.status(EngineStatus::Paused);
            }
            Some(SimCommand::Seek(fraction)) => {
                let Some(track) = track.as_mut() else {
                    continue;
                };
                if !fraction.is_finite() {
                    debug!("Simulator ignoring non-finite seek");
                    continue;
                }
                track.position = fraction.clamp(0.0, 1.0) * track.duration;
                track.finished = track.position >= track.duration;
                sink.telemetry(track.url.clone(), track.sample());
            }
            Some(SimCommand::SetSpeed(rate)) => {
                if rate.is_finite() && rate > 0.0 {
                    speed = rate;
                } else {
                    debug!("Simulator ignoring invalid rate: {}", rate);
                }
            }
            Some(SimCommand::Skip(delta_seconds)) => {
                let Some(track) = track.as_mut() else {
                    continue;
                };
                if !delta_seconds.is_finite() {
                    debug!("Simulator ignoring non-finite skip");
                    continue;
                }
                track.position = (track.position + delta_seconds).clamp(0.0, track.duration);
                track.finished = track.position >= track.duration;
                sink.telemetry(track.url.clone(), track.sample());
            }
            None => {
                // Tick: advance the virtual playhead.
                let Some(track) = track.as_mut() else {
                    continue;
                };
                track.position += options.tick_interval.as_secs_f64() * speed;
                track.buffered_percent =
                    (track.buffered_percent + options.buffer_step_percent).min(100.0);

                if track.position >= track.duration {
                    track.position = track.duration;
                    track.finished = true;
                    playing = false;
                    sink.telemetry(track.url.clone(), track.sample());
                    sink.status(EngineStatus::Finished);
                    debug!("Simulator reached end of track: {}", track.url);
                } else {
                    sink.telemetry(track.url.clone(), track.sample());
                }
            }
        }
    }

    debug!("Simulator task exiting");
}
