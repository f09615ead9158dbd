//! Circular-angle utilities shared by the fusion, smoothing, and
//! calibration stages.
//!
//! All angles are degrees. Yaw lives on a 360°-periodic axis, so plain
//! subtraction near the 0°/360° boundary is wrong; [`circular_difference`]
//! is the shortest-path replacement used everywhere a yaw delta is needed.

/// Reduce an angle to its canonical representative in `[0, 360)`.
///
/// Holds for all finite inputs, including negative multiples of 360.
pub fn normalize_yaw(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Shortest signed delta from `from` to `to` on a 360°-periodic axis.
///
/// The result is always in `(-180, 180]`. Correct across the wrap
/// boundary: `circular_difference(350.0, 10.0)` is `20.0`, not `-340.0`.
pub fn circular_difference(from: f32, to: f32) -> f32 {
    let mut diff = to - from;
    while diff > 180.0 {
        diff -= 360.0;
    }
    while diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Render an angle as `"<label>: ±X.X°"` with one decimal and an explicit
/// sign. Display only; never used for control decisions.
pub fn format_signed(angle: f32, label: &str) -> String {
    let sign = if angle >= 0.0 { '+' } else { '-' };
    format!("{label}: {sign}{:.1}°", angle.abs())
}
