//! REPL – the interactive control surface.
//!
//! Supported commands:
//!   start        – begin tracking; the current pose becomes the zero reference
//!   stop         – end tracking and clear the zero reference
//!   status       – show the current zero-referenced delta
//!   help         – show this list
//!   quit | exit  – leave the CLI

use colored::Colorize;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use oritrack_engine::format_signed;
use oritrack_middleware::{EventBus, Topic};
use oritrack_types::{Event, EventPayload, OrientationAngles};

/// Shared read-only view of the tracking state, updated by the bus
/// subscriber task in `main` and rendered by the `status` command.
pub struct StatusBoard {
    pub active: AtomicBool,
    pub latest_delta: Mutex<Option<OrientationAngles>>,
}

impl StatusBoard {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            active: AtomicBool::new(false),
            latest_delta: Mutex::new(None),
        })
    }
}

/// Entry point for the interactive REPL.
///
/// `shutdown` is polled each iteration; when set the REPL exits cleanly.
pub fn run(shutdown: Arc<AtomicBool>, bus: EventBus, status: Arc<StatusBoard>) {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if shutdown.load(Ordering::SeqCst) {
            break;
        }

        print!("{} ", "oritrack>".bold().cyan());
        stdout.flush().ok();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => break, // EOF
            Ok(_) => {}
            Err(e) => {
                eprintln!("{}: {}", "Read error".red(), e);
                break;
            }
        }

        let cmd = line.trim();
        if cmd.is_empty() {
            continue;
        }

        match cmd {
            "help" => cmd_help(),
            "start" => publish_command(&bus, EventPayload::StartTracking),
            "stop" => publish_command(&bus, EventPayload::StopTracking),
            "status" => cmd_status(&status),
            "quit" | "exit" => {
                println!("{}", "Goodbye.".green());
                shutdown.store(true, Ordering::SeqCst);
                break;
            }
            other => {
                println!(
                    "{} '{}'. Type {} for available commands.",
                    "Unknown command:".red(),
                    other.yellow(),
                    "help".bold()
                );
            }
        }
    }
}

fn publish_command(bus: &EventBus, payload: EventPayload) {
    // Best-effort: the tracking loop may not have subscribed yet during
    // startup, in which case the command is simply dropped.
    if bus
        .publish_to(Topic::Control, Event::new("oritrack-cli", payload))
        .is_err()
    {
        println!("{}", "Tracking loop is not running.".yellow());
    }
}

fn cmd_help() {
    println!();
    println!("{}", "OriTrack Commands".bold().underline());
    println!("  {}   – begin tracking (current pose becomes zero)", "start".bold().cyan());
    println!("  {}    – end tracking",                              "stop".bold().cyan());
    println!("  {}  – show the current delta",                      "status".bold().cyan());
    println!("  {} – exit the CLI",                            "quit  exit".bold().cyan());
    println!();
}

fn cmd_status(status: &StatusBoard) {
    if !status.active.load(Ordering::SeqCst) {
        println!("Orientation tracking stopped");
        return;
    }
    let delta = status.latest_delta.lock().ok().and_then(|guard| *guard);
    match delta {
        Some(delta) => println!(
            "Left/Right: {:.1}°, {}",
            delta.yaw,
            format_signed(delta.roll, "Up/Down")
        ),
        None => println!("Tracking active, waiting for the first sample …"),
    }
}
