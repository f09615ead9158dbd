//! Tilt-compensated compass fusion.
//!
//! Converts one (accelerometer, magnetometer) sample pair into an absolute
//! `(roll, yaw)` estimate:
//!
//! 1. Remap both vectors from device-native portrait axes to the landscape
//!    frame (`x' = y`, `y' = -x`, `z` unchanged).
//! 2. Derive pitch and roll from the gravity vector.
//! 3. Tilt-compensate the magnetometer using that pitch/roll.
//! 4. `raw_yaw = atan2(-my', mx')`.
//! 5. Convert to degrees and apply the empirically tuned offsets for this
//!    axis convention, then normalize yaw to `[0, 360)`.
//!
//! The remap and the `-90°` roll offset are calibration constants for the
//! physical mounting; they must not be algebraically "simplified".
//!
//! # Example
//!
//! ```rust
//! use oritrack_engine::fusion::FusionEstimator;
//! use oritrack_types::Vector3;
//!
//! let mut estimator = FusionEstimator::default();
//! estimator.update_accelerometer(Vector3::new(0.0, 0.0, 1.0));
//! estimator.update_magnetometer(Vector3::new(1.0, 0.0, 0.0));
//!
//! let angles = estimator.estimate();
//! assert!((angles.roll - (-90.0)).abs() < 1e-3);
//! ```

use oritrack_types::{OrientationAngles, SensorKind, SensorSample, Vector3};
use tracing::trace;

/// Default rounding factor: 10 → one decimal digit of precision.
pub const DEFAULT_PRECISION: f32 = 10.0;

/// Fuse a single sample pair into an absolute orientation estimate.
///
/// `precision` is the rounding factor applied to both output components
/// (10 → one decimal digit). Degenerate inputs (e.g. an all-zero
/// magnetometer vector) produce `atan2`-defined results, not errors.
pub fn fuse(accelerometer: Vector3, magnetometer: Vector3, precision: f32) -> OrientationAngles {
    // Landscape remap, applied identically to both sensors.
    let (ax, ay, az) = (accelerometer.y, -accelerometer.x, accelerometer.z);
    let (mx, my, mz) = (magnetometer.y, -magnetometer.x, magnetometer.z);

    let pitch = (-ax).atan2((ay * ay + az * az).sqrt());
    let roll = ay.atan2(az);

    // Project the magnetometer into the horizontal plane before computing
    // the heading, otherwise any tilt bleeds into yaw.
    let mx_comp = mx * pitch.cos() + mz * pitch.sin();
    let my_comp = mx * roll.sin() * pitch.sin() + my * roll.cos() - mz * roll.sin() * pitch.cos();

    let yaw = (-my_comp).atan2(mx_comp);

    // Empirical offsets for this mounting; preserved exactly as observed.
    let roll_deg = -roll.to_degrees() - 90.0;
    let yaw_deg = -yaw.to_degrees();

    // Normalize again after rounding: a yaw just below 360 rounds up to
    // exactly 360.0, which must wrap back to 0.
    OrientationAngles {
        roll: round_to(roll_deg, precision),
        yaw: crate::angles::normalize_yaw(round_to(
            crate::angles::normalize_yaw(yaw_deg),
            precision,
        )),
    }
}

fn round_to(value: f32, precision: f32) -> f32 {
    (value * precision).round() / precision
}

/// Stateful fusion front-end holding the latest sample of each kind.
///
/// The accelerometer and magnetometer report independently; the estimator
/// recomputes on every update of either, pairing it with the last-known
/// value of the other. A kind that has not reported yet defaults to the
/// zero vector.
///
/// Feed readings via [`FusionEstimator::update_accelerometer`] /
/// [`FusionEstimator::update_magnetometer`] (or [`FusionEstimator::ingest`]
/// for tagged samples), then call [`FusionEstimator::estimate`].
#[derive(Debug, Clone)]
pub struct FusionEstimator {
    precision: f32,
    last_accelerometer: Option<Vector3>,
    last_magnetometer: Option<Vector3>,
}

impl FusionEstimator {
    /// Create an estimator with the given rounding factor (clamped to ≥ 1).
    pub fn new(precision: f32) -> Self {
        Self {
            precision: precision.max(1.0),
            last_accelerometer: None,
            last_magnetometer: None,
        }
    }

    /// Feed a new accelerometer reading.
    pub fn update_accelerometer(&mut self, vector: Vector3) {
        self.last_accelerometer = Some(vector);
    }

    /// Feed a new magnetometer reading.
    pub fn update_magnetometer(&mut self, vector: Vector3) {
        self.last_magnetometer = Some(vector);
    }

    /// Route a tagged sample to the matching sensor slot.
    pub fn ingest(&mut self, sample: &SensorSample) {
        match sample.kind {
            SensorKind::Accelerometer => self.update_accelerometer(sample.vector),
            SensorKind::Magnetometer => self.update_magnetometer(sample.vector),
        }
    }

    /// Compute the instantaneous orientation estimate from the latest
    /// sample pair.
    pub fn estimate(&self) -> OrientationAngles {
        let angles = fuse(
            self.last_accelerometer.unwrap_or_default(),
            self.last_magnetometer.unwrap_or_default(),
            self.precision,
        );
        trace!(roll = angles.roll, yaw = angles.yaw, "instantaneous estimate");
        angles
    }
}

impl Default for FusionEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_PRECISION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_device_facing_north_regression_fixture() {
        // Regression baseline, computed once from the five-step pipeline:
        // accel {0,0,1}, mag {1,0,0} remap to accel {0,0,1}, mag {0,-1,0};
        // pitch = roll = 0, my' = -1, raw_yaw = atan2(1, 0) = 90°;
        // roll = -0 - 90 = -90.0, yaw = normalize(-90) = 270.0.
        let angles = fuse(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            DEFAULT_PRECISION,
        );
        assert!((angles.roll - (-90.0)).abs() < 1e-3, "roll = {}", angles.roll);
        assert!((angles.yaw - 270.0).abs() < 1e-3, "yaw = {}", angles.yaw);
    }

    #[test]
    fn zero_magnetometer_is_not_an_error() {
        // Degenerate input: atan2(0, 0) is defined (0), so yaw collapses to
        // 0 rather than panicking or returning NaN.
        let angles = fuse(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::default(),
            DEFAULT_PRECISION,
        );
        assert!(angles.yaw.abs() < 1e-3);
        assert!(angles.roll.is_finite());
    }

    #[test]
    fn yaw_output_is_normalized() {
        for step in 0..12 {
            let theta = (step as f32 * 30.0).to_radians();
            let mag = Vector3::new(theta.cos(), theta.sin(), 0.0);
            let angles = fuse(Vector3::new(0.0, 0.0, 1.0), mag, DEFAULT_PRECISION);
            assert!(
                (0.0..360.0).contains(&angles.yaw),
                "yaw {} out of range for step {step}",
                angles.yaw
            );
        }
    }

    #[test]
    fn rotating_magnetometer_rotates_yaw() {
        // Two horizontal magnetometer headings 90° apart must produce yaw
        // estimates 90° apart (up to the circular wrap).
        let a = fuse(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            DEFAULT_PRECISION,
        );
        let b = fuse(
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
            DEFAULT_PRECISION,
        );
        let diff = crate::angles::circular_difference(a.yaw, b.yaw).abs();
        assert!((diff - 90.0).abs() < 1e-2, "diff = {diff}");
    }

    #[test]
    fn precision_factor_controls_rounding() {
        let coarse = fuse(
            Vector3::new(0.02, 0.11, 0.97),
            Vector3::new(0.4, 0.1, -0.3),
            1.0,
        );
        assert!((coarse.roll - coarse.roll.round()).abs() < 1e-6);
        assert!((coarse.yaw - coarse.yaw.round()).abs() < 1e-6);

        let fine = fuse(
            Vector3::new(0.02, 0.11, 0.97),
            Vector3::new(0.4, 0.1, -0.3),
            DEFAULT_PRECISION,
        );
        assert!(((fine.roll * 10.0) - (fine.roll * 10.0).round()).abs() < 1e-4);
    }

    #[test]
    fn estimator_uses_last_known_sample_of_each_kind() {
        let mut estimator = FusionEstimator::default();
        estimator.update_accelerometer(Vector3::new(0.0, 0.0, 1.0));
        estimator.update_magnetometer(Vector3::new(1.0, 0.0, 0.0));
        let first = estimator.estimate();

        // A magnetometer-only update recomputes against the retained
        // accelerometer reading.
        estimator.update_magnetometer(Vector3::new(0.0, 1.0, 0.0));
        let second = estimator.estimate();

        assert!((first.roll - second.roll).abs() < 1e-3);
        assert!(crate::angles::circular_difference(first.yaw, second.yaw).abs() > 1.0);
    }

    #[test]
    fn estimator_with_no_samples_uses_zero_vectors() {
        let estimator = FusionEstimator::default();
        let angles = estimator.estimate();
        // Both atan2 terms collapse to 0: roll = -0 - 90, yaw = 0.
        assert!((angles.roll - (-90.0)).abs() < 1e-3);
        assert!(angles.yaw.abs() < 1e-3);
    }

    #[test]
    fn ingest_routes_by_sensor_kind() {
        use chrono::Utc;
        use oritrack_types::SensorSample;

        let mut estimator = FusionEstimator::default();
        estimator.ingest(&SensorSample {
            kind: SensorKind::Accelerometer,
            vector: Vector3::new(0.0, 0.0, 1.0),
            timestamp: Utc::now(),
        });
        estimator.ingest(&SensorSample {
            kind: SensorKind::Magnetometer,
            vector: Vector3::new(1.0, 0.0, 0.0),
            timestamp: Utc::now(),
        });
        let angles = estimator.estimate();
        assert!((angles.roll - (-90.0)).abs() < 1e-3);
        assert!((angles.yaw - 270.0).abs() < 1e-3);
    }
}
