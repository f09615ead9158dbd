//! Exponential smoothing over the circular yaw domain.
//!
//! A first-order recursive filter: each update moves `rate` of the
//! remaining distance toward the new instantaneous estimate. Naive linear
//! interpolation is wrong for yaw values straddling the 0°/360° boundary
//! (it would swing the long way around the circle), so both axes step by
//! the shortest circular difference instead. Yaw is renormalized after
//! each step; roll is carried unwrapped so continuous tilting past ±180°
//! stays continuous.

use oritrack_types::OrientationAngles;
use tracing::trace;

use crate::angles::{circular_difference, normalize_yaw};

/// Default smoothing coefficient: move 80% of the way to the new sample
/// per update, favoring responsiveness over noise rejection.
pub const DEFAULT_SMOOTHING_RATE: f32 = 0.8;

/// Running smoothed orientation estimate.
///
/// Exactly one instance exists per tracking pipeline; it is mutated in
/// place by [`SmoothingFilter::update`] and re-seeded with
/// [`SmoothingFilter::reset`].
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    /// Smoothing coefficient (clamped to `[0, 1]`).
    rate: f32,
    current: OrientationAngles,
}

impl SmoothingFilter {
    /// Create a filter seeded with `initial`.
    ///
    /// `rate` is clamped to `[0, 1]`; `1.0` tracks the input exactly,
    /// `0.0` never moves.
    pub fn new(rate: f32, initial: OrientationAngles) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
            current: OrientationAngles {
                roll: initial.roll,
                yaw: normalize_yaw(initial.yaw),
            },
        }
    }

    /// Step the filter toward `target` and return the updated estimate.
    pub fn update(&mut self, target: OrientationAngles) -> OrientationAngles {
        let yaw_delta = circular_difference(self.current.yaw, target.yaw);
        let roll_delta = circular_difference(self.current.roll, target.roll);
        self.current = OrientationAngles {
            yaw: normalize_yaw(self.current.yaw + self.rate * yaw_delta),
            roll: self.current.roll + self.rate * roll_delta,
        };
        trace!(
            roll = self.current.roll,
            yaw = self.current.yaw,
            "smoothed estimate"
        );
        self.current
    }

    /// Re-seed the filter state.
    pub fn reset(&mut self, to: OrientationAngles) {
        self.current = OrientationAngles {
            roll: to.roll,
            yaw: normalize_yaw(to.yaw),
        };
    }

    /// The current smoothed estimate.
    pub fn current(&self) -> OrientationAngles {
        self.current
    }

    /// The smoothing coefficient in effect.
    pub fn rate(&self) -> f32 {
        self.rate
    }
}

impl Default for SmoothingFilter {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_RATE, OrientationAngles::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(roll: f32, yaw: f32) -> OrientationAngles {
        OrientationAngles { roll, yaw }
    }

    #[test]
    fn converges_to_constant_target() {
        let mut filter = SmoothingFilter::new(0.8, angles(0.0, 0.0));
        let target = angles(30.0, 120.0);

        let mut previous_distance = f32::INFINITY;
        for _ in 0..20 {
            let estimate = filter.update(target);
            let distance = circular_difference(estimate.yaw, target.yaw).abs()
                + (target.roll - estimate.roll).abs();
            assert!(
                distance < previous_distance || distance < 1e-3,
                "distance did not shrink: {distance} vs {previous_distance}"
            );
            previous_distance = distance;
        }
        let settled = filter.current();
        assert!((settled.roll - 30.0).abs() < 1e-2);
        assert!((settled.yaw - 120.0).abs() < 1e-2);
    }

    #[test]
    fn yaw_crosses_wrap_boundary_without_full_swing() {
        // 350° → 10° is a +20° move through 360°, not a -340° swing.
        let mut filter = SmoothingFilter::new(0.8, angles(0.0, 350.0));
        let updated = filter.update(angles(0.0, 10.0));
        // One step covers 0.8 * 20 = 16°: 350 + 16 = 366 → 6.
        assert!((updated.yaw - 6.0).abs() < 1e-3, "yaw = {}", updated.yaw);
    }

    #[test]
    fn yaw_stays_normalized_after_updates() {
        let mut filter = SmoothingFilter::new(0.8, angles(0.0, 355.0));
        for target_yaw in [5.0, 15.0, 25.0, 355.0, 345.0] {
            let estimate = filter.update(angles(0.0, target_yaw));
            assert!(
                (0.0..360.0).contains(&estimate.yaw),
                "yaw {} escaped [0, 360)",
                estimate.yaw
            );
        }
    }

    #[test]
    fn roll_is_not_renormalized() {
        // Roll walks linearly; a target past the wrap point must not fold
        // the accumulated state back into [0, 360).
        let mut filter = SmoothingFilter::new(1.0, angles(170.0, 0.0));
        let updated = filter.update(angles(190.0, 0.0));
        assert!((updated.roll - 190.0).abs() < 1e-3, "roll = {}", updated.roll);
    }

    #[test]
    fn rate_one_tracks_input_exactly() {
        let mut filter = SmoothingFilter::new(1.0, angles(0.0, 0.0));
        let estimate = filter.update(angles(-12.5, 42.0));
        assert!((estimate.roll - (-12.5)).abs() < 1e-3);
        assert!((estimate.yaw - 42.0).abs() < 1e-3);
    }

    #[test]
    fn rate_zero_never_moves() {
        let mut filter = SmoothingFilter::new(0.0, angles(5.0, 15.0));
        let estimate = filter.update(angles(90.0, 270.0));
        assert!((estimate.roll - 5.0).abs() < 1e-3);
        assert!((estimate.yaw - 15.0).abs() < 1e-3);
    }

    #[test]
    fn rate_clamped_to_unit_interval() {
        let high = SmoothingFilter::new(5.0, OrientationAngles::default());
        assert!((high.rate() - 1.0).abs() < 1e-5);

        let low = SmoothingFilter::new(-1.0, OrientationAngles::default());
        assert!((low.rate() - 0.0).abs() < 1e-5);
    }

    #[test]
    fn reset_reseeds_state() {
        let mut filter = SmoothingFilter::new(0.8, angles(0.0, 0.0));
        filter.update(angles(30.0, 90.0));
        filter.reset(angles(-5.0, 400.0));
        let current = filter.current();
        assert!((current.roll - (-5.0)).abs() < 1e-3);
        // Yaw is normalized on reset.
        assert!((current.yaw - 40.0).abs() < 1e-3);
    }
}
