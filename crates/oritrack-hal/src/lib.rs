//! `oritrack-hal` – The sensor input boundary.
//!
//! # Modules
//!
//! - [`feed`] – [`SensorFeed`][feed::SensorFeed]: the trait a sample
//!   source implements to deliver timestamped accelerometer/magnetometer
//!   readings as one interleaved stream.
//! - [`sim`] – [`SimSensorFeed`][sim::SimSensorFeed] and
//!   [`ScriptedSensorFeed`][sim::ScriptedSensorFeed]: simulated feeds so
//!   the full stack runs in headless tests and CI pipelines without any
//!   physical sensors.

pub mod feed;
pub mod sim;

pub use feed::SensorFeed;
pub use sim::{ScriptedSensorFeed, SimSensorFeed};
