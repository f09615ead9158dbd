//! The delivery boundary.
//!
//! The tracking loop never speaks a wire protocol directly. It hands each
//! zero-referenced delta to a [`DeliverySink`]; implementations translate
//! it into whatever the outside world expects (the reference
//! implementation POSTs JSON to a `/coordinates` endpoint).

use async_trait::async_trait;
use oritrack_types::{OrientationAngles, TrackError};

/// Every delivery backend must implement this trait.
///
/// # Contract
///
/// * `deliver` – forward one delta to the remote sink. `Ok(())` means
///   accepted; any `Err` means the tracking session must stop. Transport
///   errors and explicit rejections are deliberately indistinguishable to
///   the caller.
/// * Deliveries may be slow (network I/O); callers must not assume the
///   future resolves promptly.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Forward one orientation delta to the remote sink.
    async fn deliver(&self, delta: OrientationAngles) -> Result<(), TrackError>;
}
