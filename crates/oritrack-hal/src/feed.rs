//! The sensor input boundary.
//!
//! The engine never talks to sensor hardware directly; it consumes a
//! stream of [`SensorSample`] values. A [`SensorFeed`] implementation
//! produces that stream from whatever source exists – a device driver, a
//! network bridge, or the simulated feeds in [`sim`][crate::sim].

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use oritrack_types::SensorSample;

/// Every sample source must implement this trait.
///
/// # Contract
///
/// * `sample_stream` – returns a live stream of timestamped samples.
///   Accelerometer and magnetometer readings arrive interleaved on the
///   same stream at the feed's nominal interval; consumers pair each
///   reading with the last-known value of the other kind.
/// * The stream ends when the underlying source shuts down; consumers
///   treat the end of the stream as feed shutdown.
#[async_trait]
pub trait SensorFeed: Send + Sync {
    /// Open the live sample stream.
    async fn sample_stream(&self) -> BoxStream<'static, SensorSample>;
}
