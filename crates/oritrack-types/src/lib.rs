use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A raw tri-axis sensor reading in device-native axes.
///
/// One value is produced per sensor callback and never mutated afterwards.
/// The same type carries both accelerometer (g) and magnetometer (µT)
/// readings; [`SensorKind`] disambiguates them on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Which physical sensor produced a [`SensorSample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorKind {
    Accelerometer,
    Magnetometer,
}

/// A single timestamped reading delivered by the sensor feed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    pub kind: SensorKind,
    pub vector: Vector3,
    pub timestamp: DateTime<Utc>,
}

/// A two-axis orientation estimate in degrees.
///
/// `yaw` is a compass heading, always stored normalized to `[0, 360)`.
/// `roll` is a tilt from level and is deliberately never wrapped, so
/// continuous tilting does not produce a discontinuous jump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrientationAngles {
    pub roll: f32,
    pub yaw: f32,
}

impl OrientationAngles {
    pub fn new(roll: f32, yaw: f32) -> Self {
        Self { roll, yaw }
    }
}

/// Why a tracking session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The operator issued an explicit stop command.
    Requested,
    /// The delivery sink rejected or failed a delivery; the session is
    /// disabled until the operator restarts it.
    DeliveryFailed,
}

/// Unified event wrapper routed over the internal event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    /// e.g., "oritrack-runtime::tracking_loop"
    pub source: String,
    pub payload: EventPayload,
}

impl Event {
    /// Build an event stamped with a fresh id and the current time.
    pub fn new(source: impl Into<String>, payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            source: source.into(),
            payload,
        }
    }
}

/// Variants of data routed over the internal event bus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    /// Control surface: begin tracking, capturing the zero reference.
    StartTracking,
    /// Control surface: end tracking and clear the zero reference.
    StopTracking,
    /// A zero-referenced orientation delta produced by the tracking loop.
    OrientationDelta(OrientationAngles),
    /// A session became active; `reference` is the captured zero pose.
    SessionStarted { reference: OrientationAngles },
    /// A session ended, either on request or after a delivery failure.
    SessionStopped { reason: StopReason },
}

/// Global error type spanning delivery, channel, and configuration failures.
#[derive(Error, Debug, Serialize, Deserialize)]
pub enum TrackError {
    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Event bus channel error: {0}")]
    Channel(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
