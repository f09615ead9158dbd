//! Zero-reference calibration.
//!
//! When tracking starts, the instantaneous smoothed estimate is captured
//! as the zero pose; every subsequent estimate is reported as a signed
//! delta from it. No averaging or debounce: the snapshot at activation
//! time is the reference.

use oritrack_types::OrientationAngles;

use crate::angles::circular_difference;

/// An orientation snapshot captured at tracking start.
///
/// Both delta components use the shortest-path circular difference, so a
/// displayed relative angle is always a signed value in `(-180, 180]` —
/// a true rotation of `-10°` is never reported as `350°`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZeroReference {
    reference: OrientationAngles,
}

impl ZeroReference {
    /// Capture `current` as the new zero pose.
    pub fn capture(current: OrientationAngles) -> Self {
        Self { reference: current }
    }

    /// Signed angular delta of `current` from the zero pose.
    pub fn delta(&self, current: OrientationAngles) -> OrientationAngles {
        OrientationAngles {
            roll: circular_difference(self.reference.roll, current.roll),
            yaw: circular_difference(self.reference.yaw, current.yaw),
        }
    }

    /// The captured zero pose.
    pub fn reference(&self) -> OrientationAngles {
        self.reference
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(roll: f32, yaw: f32) -> OrientationAngles {
        OrientationAngles { roll, yaw }
    }

    #[test]
    fn delta_at_capture_point_is_zero() {
        for pose in [angles(0.0, 0.0), angles(-37.5, 341.2), angles(12.0, 180.0)] {
            let reference = ZeroReference::capture(pose);
            let delta = reference.delta(pose);
            assert!(delta.roll.abs() < 1e-5);
            assert!(delta.yaw.abs() < 1e-5);
        }
    }

    #[test]
    fn delta_is_shortest_path_across_wrap() {
        // Reference at yaw 350, live estimate at yaw 5: the true rotation
        // is +15°, not -345°.
        let reference = ZeroReference::capture(angles(10.0, 350.0));
        let delta = reference.delta(angles(12.0, 5.0));
        assert!((delta.roll - 2.0).abs() < 1e-5);
        assert!((delta.yaw - 15.0).abs() < 1e-5);
    }

    #[test]
    fn delta_is_signed_both_directions() {
        let reference = ZeroReference::capture(angles(0.0, 10.0));
        let left = reference.delta(angles(0.0, 350.0));
        assert!((left.yaw - (-20.0)).abs() < 1e-5);

        let right = reference.delta(angles(0.0, 30.0));
        assert!((right.yaw - 20.0).abs() < 1e-5);
    }

    #[test]
    fn roll_delta_also_uses_circular_difference() {
        // Roll is not wrap-normalized elsewhere, but the *delta* is still
        // the shortest signed path.
        let reference = ZeroReference::capture(angles(170.0, 0.0));
        let delta = reference.delta(angles(-170.0, 0.0));
        assert!((delta.roll - 20.0).abs() < 1e-5);
    }
}
