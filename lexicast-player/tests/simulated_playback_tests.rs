//! End-to-end playback tests against the simulated engine
//!
//! No spies here: the real SimulatedEngine plays a short virtual track while
//! the test observes only the public controller surface, the way an embedding
//! UI would.


use std::sync::Arc;
use std::time::Duration;

use lexicast_common::{AudioUrl, PlaybackPhase, PlayerConfig, PlayerEvent};
use lexicast_player::{AudioEngine, PlayerController, SimulatedEngine, SimulatorOptions};

use spy_engine::{wait_for_event, wait_for_signals, wait_for_state};

const TRACK: &str = "sim://lessons/grammar-gameshow-01";

/// One virtual minute of audio, ticking fast enough to finish within the
/// test deadlines.
fn fast_sim() -> SimulatorOptions {
    SimulatorOptions {
        track_duration: 60.0,
        tick_interval: Duration::from_millis(10),
        buffer_step_percent: 25.0,
        load_delay: Duration::from_millis(1),
    }
}

fn spawn_with_sim() -> PlayerController {
    let options = fast_sim();
    PlayerController::spawn(PlayerConfig::default(), move |sink| {
        SimulatedEngine::spawn(sink, options) as Arc<dyn AudioEngine>
    })
}

/// Full pass through the public surface: load, readiness, playback progress,
/// a seek near the end, and completion, with display signals formatted along
/// the way.
#[tokio::test]
async fn test_complete_playback_flow() -> anyhow::Result<()> {
    let controller = spawn_with_sim();
    let mut state_rx = controller.observe_state();
    let mut signals_rx = controller.observe_signals();
    let mut events = controller.subscribe_events();

    controller.load_audio(TRACK)?;
    let event = wait_for_event(&mut events, "Ready").await;
    match event {
        PlayerEvent::Ready { url, .. } => assert_eq!(url, AudioUrl::from(TRACK)),
        other => panic!("unexpected event: {:?}", other),
    }
    assert_eq!(controller.current_state().phase, PlaybackPhase::Paused);

    controller.toggle_play_pause()?;
    wait_for_state(&mut state_rx, |s| s.is_playing()).await;

    // The playhead advances and the one-minute duration formats as 01:00
    let signals = wait_for_signals(&mut signals_rx, |s| s.current_seconds > 0.0).await;
    assert_eq!(signals.total_time_text, "01:00");
    assert!(signals.buffered_fraction > 0.0);

    // Jump near the end and let the track run out
    controller.seek(0.995)?;
    wait_for_signals(&mut signals_rx, |s| s.current_seconds >= 59.7).await;

    let event = wait_for_event(&mut events, "TrackFinished").await;
    match event {
        PlayerEvent::TrackFinished { url, .. } => assert_eq!(url, AudioUrl::from(TRACK)),
        other => panic!("unexpected event: {:?}", other),
    }
    let state = wait_for_state(&mut state_rx, |s| s.phase == PlaybackPhase::Finished).await;
    assert_eq!(state.loaded_url, Some(AudioUrl::from(TRACK)));

    // The final telemetry frame pinned the playhead to the end of the track
    let signals = wait_for_signals(&mut signals_rx, |s| s.current_seconds >= 60.0).await;
    assert_eq!(signals.current_time_text, "01:00");

    println!("✓ Simulated track loaded, played, sought, and finished end to end");
    controller.shutdown().await;
    Ok(())
}

/// A rate applied while playing reaches the engine and shows up in the
/// projected signals on the next telemetry frame.
#[tokio::test]
async fn test_speed_change_reflected_in_signals() -> anyhow::Result<()> {
    let controller = spawn_with_sim();
    let mut state_rx = controller.observe_state();
    let mut signals_rx = controller.observe_signals();

    controller.load_audio(TRACK)?;
    controller.toggle_play_pause()?;
    wait_for_state(&mut state_rx, |s| s.is_playing()).await;

    controller.set_speed(2.0)?;
    let signals = wait_for_signals(&mut signals_rx, |s| s.speed == 2.0).await;
    assert_eq!(signals.total_seconds, 60.0);

    println!("✓ Applied rate carried into the projected signals");
    controller.shutdown().await;
    Ok(())
}
