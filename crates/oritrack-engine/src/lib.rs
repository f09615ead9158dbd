//! `oritrack-engine` – Orientation estimation core.
//!
//! Pure and stateful transforms that turn raw accelerometer/magnetometer
//! samples into a stabilized `(roll, yaw)` estimate relative to a zero
//! reference. Invoked sequentially per sample; no internal parallelism.
//!
//! # Modules
//!
//! - [`angles`] – wraparound normalization, shortest circular difference,
//!   and signed display formatting for 360°-periodic angles.
//! - [`fusion`] – [`FusionEstimator`][fusion::FusionEstimator]: landscape
//!   axis remap plus tilt-compensated compass fusion, producing an absolute
//!   estimate from the latest sample of each sensor kind.
//! - [`filter`] – [`SmoothingFilter`][filter::SmoothingFilter]: a
//!   first-order recursive filter that interpolates along the shortest
//!   circular path, so estimates straddling 0°/360° never swing the long
//!   way around.
//! - [`calibration`] – [`ZeroReference`][calibration::ZeroReference]: the
//!   zero-pose snapshot and signed delta against it.

pub mod angles;
pub mod calibration;
pub mod filter;
pub mod fusion;

pub use angles::{circular_difference, format_signed, normalize_yaw};
pub use calibration::ZeroReference;
pub use filter::{DEFAULT_SMOOTHING_RATE, SmoothingFilter};
pub use fusion::{DEFAULT_PRECISION, FusionEstimator, fuse};
