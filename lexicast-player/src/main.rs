//! Lexicast player - interactive harness
//!
//! Runs the playback controller against the simulated engine, takes commands
//! on stdin, and prints player events as JSON lines on stdout. Useful for
//! poking at the player by hand and for demos.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lexicast_common::{PlayerConfig, PlayerEvent};
use lexicast_player::engine::{AudioEngine, SimulatedEngine, SimulatorOptions};
use lexicast_player::PlayerController;

/// Rate change applied by the `faster` and `slower` commands
const SPEED_STEP: f64 = 0.25;

/// Command-line arguments for lexicast-player
#[derive(Parser, Debug)]
#[command(name = "lexicast-player")]
#[command(about = "Interactive harness for the Lexicast playback controller")]
#[command(version)]
struct Args {
    /// Path to a config file (otherwise resolved from env and platform dirs)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Track to load on startup
    #[arg(short, long, env = "LEXICAST_AUDIO_URL")]
    audio_url: Option<String>,

    /// Begin playback immediately after loading
    #[arg(long)]
    autoplay: bool,

    /// Simulated track duration in seconds
    #[arg(long, default_value_t = 180.0)]
    duration: f64,

    /// Simulated telemetry tick interval in milliseconds
    #[arg(long, default_value_t = 500)]
    tick_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing; RUST_LOG overrides --log-level when set
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "lexicast_player={0},lexicast_common={0}",
                    args.log_level
                ))
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config =
        PlayerConfig::resolve(args.config.as_deref()).context("Failed to load configuration")?;
    info!(
        "Starting Lexicast player (speed band {}..{}, skip step {}s)",
        config.speed_min, config.speed_max, config.skip_step_seconds
    );

    let options = SimulatorOptions {
        track_duration: args.duration,
        tick_interval: Duration::from_millis(args.tick_ms),
        ..SimulatorOptions::default()
    };
    let controller = PlayerController::spawn(config, move |sink| {
        SimulatedEngine::spawn(sink, options) as Arc<dyn AudioEngine>
    });

    let printer = spawn_event_printer(controller.subscribe_events());

    if let Some(url) = args.audio_url {
        controller.load_audio(url).context("Player not running")?;
        if args.autoplay {
            controller
                .toggle_play_pause()
                .context("Player not running")?;
        }
    } else if args.autoplay {
        warn!("--autoplay ignored: no --audio-url given");
    }

    run_command_loop(&controller).await?;

    controller.shutdown().await;
    let _ = printer.await;
    info!("Player shutdown complete");
    Ok(())
}

/// Print every player event as one JSON line on stdout.
fn spawn_event_printer(mut events: broadcast::Receiver<PlayerEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(line) => println!("{}", line),
                    Err(err) => warn!("Failed to serialize event: {}", err),
                },
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    warn!("Event printer lagged, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

/// Read commands from stdin until quit, EOF, or a shutdown signal.
async fn run_command_loop(controller: &PlayerController) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print_help();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => {
                        if !dispatch(controller, line.trim())? {
                            break;
                        }
                    }
                    None => break,
                }
            }
            _ = shutdown_signal() => break,
        }
    }
    Ok(())
}

/// Apply one line of input. Returns false when the user asked to quit.
fn dispatch(controller: &PlayerController, line: &str) -> Result<bool> {
    let mut parts = line.split_whitespace();
    let Some(command) = parts.next() else {
        return Ok(true);
    };
    let argument = parts.next();

    match command {
        "load" => match argument {
            Some(url) => controller.load_audio(url)?,
            None => eprintln!("usage: load <url>"),
        },
        "toggle" | "t" => controller.toggle_play_pause()?,
        "seek" => match parse_number(argument) {
            Some(fraction) => controller.seek(fraction)?,
            None => eprintln!("usage: seek <fraction 0.0-1.0>"),
        },
        "speed" => match parse_number(argument) {
            Some(rate) => controller.set_speed(rate)?,
            None => eprintln!("usage: speed <rate>"),
        },
        "faster" => controller.adjust_speed(SPEED_STEP)?,
        "slower" => controller.adjust_speed(-SPEED_STEP)?,
        "forward" | "f" => controller.skip_forward()?,
        "back" | "b" => controller.skip_backward()?,
        "state" => print_state(controller)?,
        "help" | "?" => print_help(),
        "quit" | "q" => return Ok(false),
        other => eprintln!("unknown command: {} (try 'help')", other),
    }
    Ok(true)
}

fn parse_number(argument: Option<&str>) -> Option<f64> {
    argument.and_then(|a| a.parse::<f64>().ok())
}

fn print_state(controller: &PlayerController) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string(&controller.current_state())?
    );
    println!(
        "{}",
        serde_json::to_string(&controller.current_signals())?
    );
    Ok(())
}

fn print_help() {
    eprintln!("commands:");
    eprintln!("  load <url>       attach a track");
    eprintln!("  toggle | t       play/pause");
    eprintln!("  seek <fraction>  jump to a point, 0.0-1.0");
    eprintln!("  speed <rate>     set playback rate (applies while playing)");
    eprintln!("  faster | slower  nudge the rate by {}", SPEED_STEP);
    eprintln!("  forward | f      skip ahead");
    eprintln!("  back | b         skip back");
    eprintln!("  state            print current snapshots");
    eprintln!("  quit | q         exit");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
