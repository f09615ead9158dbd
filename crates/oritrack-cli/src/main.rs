//! `oritrack-cli` – OriTrack command line interface.
//!
//! The entry point for the orientation tracking stack. It:
//!
//! 1. Loads `~/.oritrack/config.toml` (defaults are used when absent;
//!    `ORITRACK_*` environment variables override individual fields).
//! 2. Wires the sensor feed → tracking loop → coordinate sink pipeline
//!    over the event bus. Until a hardware sensor bridge is connected,
//!    the simulated feed supplies samples so the stack runs headless.
//! 3. Drops the operator into an interactive REPL with `start`, `stop`,
//!    and `status` commands.
//! 4. Intercepts **Ctrl-C** to stop any active session and exit cleanly.

mod config;
mod repl;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use colored::Colorize;
use tracing::warn;

use oritrack_hal::{SensorFeed, SimSensorFeed};
use oritrack_middleware::{EventBus, Topic};
use oritrack_runtime::{CoordinateSink, TrackingLoop, TrackingLoopConfig};
use oritrack_types::{Event, EventPayload, StopReason};

use repl::StatusBoard;

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set ORITRACK_LOG_FORMAT=json to emit newline-delimited JSON logs for
    // log aggregators. The REPL's user-facing output uses println! for UX
    // consistency.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("ORITRACK_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            println!(
                "  No config at {}; using defaults.",
                config::config_path().display()
            );
            config::Config::default()
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using default configuration.");
            config::Config::default()
        }
    };
    println!("  Coordinate sink: {}", cfg.sink_url.bold());
    println!(
        "  Sample interval: {} ms, smoothing rate: {}\n",
        cfg.sample_interval_ms, cfg.smoothing_rate
    );

    // ── Shared state ──────────────────────────────────────────────────────
    let bus = EventBus::default();
    let status = StatusBoard::new();
    let shutdown = Arc::new(AtomicBool::new(false));

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    // Stop any active session before exiting so the remote sink is not
    // left chasing a stale delta.
    let bus_for_ctrlc = bus.clone();
    let shutdown_for_ctrlc = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received – shutting down …".yellow().bold());
        let _ = bus_for_ctrlc.publish_to(
            Topic::Control,
            Event::new("oritrack-cli", EventPayload::StopTracking),
        );
        shutdown_for_ctrlc.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "Failed to install Ctrl-C handler; graceful shutdown on Ctrl-C will not be available");
    }

    // ── Async stack ───────────────────────────────────────────────────────
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("{}: {}", "Failed to start async runtime".red(), e);
            return;
        }
    };

    // Subscribe on this thread, before the REPL can publish, so no early
    // command is missed.
    let control_rx = bus.subscribe_to(Topic::Control);

    // Tracking pipeline: simulated feed → loop → HTTP sink.
    let tracker = TrackingLoop::new(
        TrackingLoopConfig {
            smoothing_rate: cfg.smoothing_rate,
            ..TrackingLoopConfig::default()
        },
        Arc::new(CoordinateSink::new(cfg.sink_url.clone())),
        bus.clone(),
    );
    let interval = Duration::from_millis(cfg.sample_interval_ms);
    runtime.spawn(async move {
        let feed = SimSensorFeed::new(interval);
        let samples = feed.sample_stream().await;
        tracker.run(samples, control_rx).await;
    });

    // Presentation subscriber: keeps the status board current and surfaces
    // the one-time delivery-failure notice.
    runtime.spawn(watch_events(bus.clone(), status.clone()));

    println!("  Type {} for a list of commands.\n", "help".bold().cyan());

    // ── Interactive REPL ──────────────────────────────────────────────────
    repl::run(shutdown, bus, status);

    runtime.shutdown_background();
}

/// Mirror bus traffic into the [`StatusBoard`] and print user-facing
/// notices for session lifecycle changes.
async fn watch_events(bus: EventBus, status: Arc<StatusBoard>) {
    let mut orientation_rx = bus.subscribe_to(Topic::Orientation);
    let mut alerts_rx = bus.subscribe_to(Topic::SystemAlerts);

    loop {
        tokio::select! {
            maybe = orientation_rx.recv_lossy() => {
                let Some(event) = maybe else { break };
                if let EventPayload::OrientationDelta(delta) = event.payload
                    && let Ok(mut guard) = status.latest_delta.lock()
                {
                    *guard = Some(delta);
                }
            }
            maybe = alerts_rx.recv_lossy() => {
                let Some(event) = maybe else { break };
                match event.payload {
                    EventPayload::SessionStarted { .. } => {
                        status.active.store(true, Ordering::SeqCst);
                        println!("\n{}", "Orientation tracking started.".green());
                    }
                    EventPayload::SessionStopped { reason } => {
                        status.active.store(false, Ordering::SeqCst);
                        if let Ok(mut guard) = status.latest_delta.lock() {
                            *guard = None;
                        }
                        match reason {
                            StopReason::Requested => {
                                println!("\n{}", "Orientation tracking stopped.".yellow());
                            }
                            StopReason::DeliveryFailed => {
                                println!(
                                    "\n{}",
                                    "Network issue, stopping orientation tracking.".red().bold()
                                );
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

fn print_banner() {
    println!();
    println!("{}", r#"   ____       _ ______                __  "#.bold().cyan());
    println!("{}", r#"  / __ \_____(_)_  __/________ ______/ /__"#.bold().cyan());
    println!("{}", r#" / / / / ___/ / / / / ___/ __ `/ ___/ //_/"#.bold().cyan());
    println!("{}", r#"/ /_/ / /  / / / / / /  / /_/ / /__/ ,<   "#.bold().cyan());
    println!("{}", r#"\____/_/  /_/ /_/ /_/   \__,_/\___/_/|_|  "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "OriTrack".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Tilt-compensated orientation tracking");
    println!();
}
