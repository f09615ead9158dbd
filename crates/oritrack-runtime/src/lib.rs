//! `oritrack-runtime` – The reporting loop.
//!
//! Where the engine's estimates become outbound reports.
//!
//! # Modules
//!
//! - [`session`] – [`TrackingSession`][session::TrackingSession]: the
//!   `Idle`/`Tracking` state machine. The zero reference lives inside the
//!   `Tracking` variant, so an active session without a reference cannot
//!   be represented.
//! - [`tracking_loop`] – [`TrackingLoop`][tracking_loop::TrackingLoop]:
//!   the orchestrator that ingests sensor samples, smooths them, computes
//!   zero-referenced deltas, and forwards them to a
//!   [`DeliverySink`][oritrack_middleware::DeliverySink] with at most one
//!   delivery outstanding. A failed delivery forces the session to idle
//!   and raises a `SessionStopped` alert on the bus.
//! - [`coordinate_sink`] – [`CoordinateSink`][coordinate_sink::CoordinateSink]:
//!   the reqwest-backed sink that POSTs `{roll, yaw}` JSON to the remote
//!   `/coordinates` endpoint.

pub mod coordinate_sink;
pub mod session;
pub mod tracking_loop;

pub use coordinate_sink::CoordinateSink;
pub use session::{SessionState, TrackingSession};
pub use tracking_loop::{TrackingLoop, TrackingLoopConfig};
