//! Pure computation helpers extracted for testability.
//!
//! All functions in this module are free of Bevy ECS dependencies and operate
//! on plain numeric / `Vec2` inputs, making them straightforward to unit-test.

use bevy::color::Srgba;
use bevy::prelude::Vec2;

/// Height of a flat-topped hexagon with edge length `size` (`sqrt(3) * size`).
pub fn hex_height(size: f32) -> f32 {
    3f32.sqrt() * size
}

/// Squared euclidean distance between two points.
pub fn distance_sq(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Normalized proximity for a point at squared distance `distance_sq` from a
/// cell center.
///
/// Returns `1.0` at the center and `0.0` exactly on the radius. Callers only
/// invoke this for in-range cells, so the result stays in `[0, 1]`.
pub fn pulse_intensity(distance_sq: f32, radius: f32) -> f32 {
    1.0 - distance_sq.sqrt() / radius
}

/// Rounds a pulse signal to the three decimals consumed by the styling layer.
pub fn quantize_pulse(intensity: f32) -> f32 {
    (intensity * 1000.0).round() / 1000.0
}

/// Upper bound on the anchors [`covering_count`] places along one axis,
/// overscan excluded.
pub const MAX_SPAN: u32 = 4096;

/// Number of anchors of `spacing` needed to cover `extent`, plus `overscan`.
///
/// Non-finite or negative extents count as zero, and the covering part is
/// capped at [`MAX_SPAN`].
pub fn covering_count(extent: f32, spacing: f32, overscan: u32) -> u32 {
    let extent = if extent.is_finite() { extent.max(0.0) } else { 0.0 };
    let span = (extent / spacing).ceil();
    let span = if span.is_nan() {
        0
    } else {
        span.min(MAX_SPAN as f32) as u32
    };
    span.saturating_add(overscan)
}

/// Converts a viewport position (origin top-left, y down) to 2D world space
/// for a camera centred on a viewport of size `viewport` (origin centre, y up).
pub fn viewport_to_world(pos: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(pos.x - viewport.x / 2.0, viewport.y / 2.0 - pos.y)
}

/// Sine pulse in `[0, 1]` for time `t` seconds into a cycle of `period`.
pub fn pulse_wave(t: f32, period: f32) -> f32 {
    0.5 + 0.5 * (t * std::f32::consts::TAU / period).sin()
}

/// Component-wise linear blend between two colours, `t` clamped to `[0, 1]`.
pub fn blend(from: Srgba, to: Srgba, t: f32) -> Srgba {
    let t = t.clamp(0.0, 1.0);
    Srgba::new(
        from.red + (to.red - from.red) * t,
        from.green + (to.green - from.green) * t,
        from.blue + (to.blue - from.blue) * t,
        from.alpha + (to.alpha - from.alpha) * t,
    )
}
