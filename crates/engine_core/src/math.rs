//! Small numeric helpers with degenerate-input fallbacks.
//!
//! Every normalization in the scene goes through [`safe_normalize`] so a
//! near-zero vector never turns into NaN on its way to the renderer.

use glam::Vec3;

/// Squared length below which a vector is treated as degenerate.
pub const NORMALIZE_EPSILON_SQ: f32 = 1e-6;

/// Normalize `v`, or return `fallback` when `|v|² < 1e-6`.
///
/// `fallback` is returned as given; callers pass unit axes.
#[inline]
pub fn safe_normalize(v: Vec3, fallback: Vec3) -> Vec3 {
    safe_normalize_with(v, NORMALIZE_EPSILON_SQ, fallback)
}

/// Like [`safe_normalize`] with a caller-chosen squared-length threshold.
#[inline]
pub fn safe_normalize_with(v: Vec3, min_length_sq: f32, fallback: Vec3) -> Vec3 {
    try_normalize_with(v, min_length_sq).unwrap_or(fallback)
}

/// Normalized `v`, or `None` when `|v|² < 1e-6`. For callers that keep
/// their previous value on a degenerate input.
#[inline]
pub fn try_safe_normalize(v: Vec3) -> Option<Vec3> {
    try_normalize_with(v, NORMALIZE_EPSILON_SQ)
}

/// Normalized `v`, or `None` below `min_length_sq` or when not finite.
#[inline]
pub fn try_normalize_with(v: Vec3, min_length_sq: f32) -> Option<Vec3> {
    let length_sq = v.length_squared();
    (length_sq.is_finite() && length_sq >= min_length_sq && length_sq > 0.0)
        .then(|| v / length_sq.sqrt())
}

/// Clamp `value` into `[min, max]`; NaN becomes `fallback`.
#[inline]
pub fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

/// Wrap `value` into `[0, period)`. Non-positive periods and non-finite
/// values collapse to 0.
pub fn wrap_into(value: f32, period: f32) -> f32 {
    if period <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    let mut wrapped = value % period;
    if wrapped < 0.0 {
        wrapped += period;
    }
    // -tiny % p + p can round up to exactly p
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// Hermite smoothstep between `edge0` and `edge1`.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Per-frame blend weight `clamp(dt * rate, 0, 1)`.
///
/// Frame-rate dependent; the wind and particle smoothing use this discrete
/// form as is.
#[inline]
pub fn frame_blend(dt: f32, rate: f32) -> f32 {
    (dt * rate).clamp(0.0, 1.0)
}
