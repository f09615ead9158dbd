//! [`CoordinateSink`] – HTTP delivery backend.
//!
//! POSTs each orientation delta as JSON to the remote gimbal controller's
//! `/coordinates` endpoint:
//!
//! ```json
//! { "roll": -12.5, "yaw": 15.0 }
//! ```
//!
//! Both components are rounded to one decimal on the wire. Connection
//! errors, timeouts, and non-2xx responses are all collapsed into
//! [`TrackError::Delivery`] – the tracking loop does not distinguish
//! transport failures from rejections.
//!
//! # Example
//!
//! ```rust,no_run
//! use oritrack_runtime::coordinate_sink::CoordinateSink;
//!
//! let sink = CoordinateSink::new("http://localhost:8780");
//! // sink.deliver(delta).await? forwards one delta.
//! ```

use async_trait::async_trait;
use oritrack_middleware::DeliverySink;
use oritrack_types::{OrientationAngles, TrackError};
use serde::Serialize;
use tracing::debug;

/// Wire payload for the `/coordinates` endpoint.
#[derive(Debug, Serialize)]
struct CoordinatePayload {
    roll: f32,
    yaw: f32,
}

impl CoordinatePayload {
    fn from_delta(delta: OrientationAngles) -> Self {
        Self {
            roll: round_one_decimal(delta.roll),
            yaw: round_one_decimal(delta.yaw),
        }
    }
}

fn round_one_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

/// An async HTTP client for the remote coordinate endpoint.
///
/// Construct once and reuse across deliveries; the underlying
/// [`reqwest::Client`] pools connections.
pub struct CoordinateSink {
    base_url: String,
    client: reqwest::Client,
}

impl CoordinateSink {
    /// Create a sink pointing at `base_url`
    /// (e.g. `"http://localhost:8780"`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn post_delta(&self, delta: OrientationAngles) -> Result<(), reqwest::Error> {
        let url = format!("{}/coordinates", self.base_url.trim_end_matches('/'));
        let payload = CoordinatePayload::from_delta(delta);
        debug!(roll = payload.roll, yaw = payload.yaw, "posting delta");
        self.client
            .post(&url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl DeliverySink for CoordinateSink {
    async fn deliver(&self, delta: OrientationAngles) -> Result<(), TrackError> {
        self.post_delta(delta)
            .await
            .map_err(|e| TrackError::Delivery(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_is_rounded_to_one_decimal() {
        let payload = CoordinatePayload::from_delta(OrientationAngles::new(-12.3456, 359.987));
        assert!((payload.roll - (-12.3)).abs() < 1e-5);
        assert!((payload.yaw - 360.0).abs() < 1e-5);
    }

    #[test]
    fn payload_serializes_roll_and_yaw_fields() {
        let payload = CoordinatePayload::from_delta(OrientationAngles::new(2.0, 15.0));
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["roll"], 2.0);
        assert_eq!(json["yaw"], 15.0);
    }

    #[test]
    fn trailing_slash_in_base_url_is_tolerated() {
        let sink = CoordinateSink::new("http://localhost:8780/");
        assert_eq!(sink.base_url.trim_end_matches('/'), "http://localhost:8780");
    }

    #[tokio::test]
    async fn unreachable_sink_maps_to_delivery_error() {
        // Nothing listens on the discard port – the connection is refused
        // immediately, which must surface as a delivery failure.
        let sink = CoordinateSink::new("http://127.0.0.1:9");
        let result = sink.deliver(OrientationAngles::new(0.0, 0.0)).await;
        assert!(matches!(result, Err(TrackError::Delivery(_))));
    }
}
