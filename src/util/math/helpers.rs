/// Lengths and speeds below this are treated as zero by the geometry code.
pub const GEOM_EPS: f64 = 1e-6;

/// Clamps `value` from below.
///
/// # Arguments
/// - `value`: The value to clamp.
/// - `low`: The lower bound.
///
/// # Returns
/// - `value` if it is at least `low`, `low` otherwise.
pub fn clamp_l(value: f64, low: f64) -> f64 { value.max(low) }

/// Clamps `value` from above.
///
/// # Arguments
/// - `value`: The value to clamp.
/// - `high`: The upper bound.
///
/// # Returns
/// - `value` if it is at most `high`, `high` otherwise.
pub fn clamp_h(value: f64, high: f64) -> f64 { value.min(high) }

/// Cosine-safe sine: `sqrt(1 - cos^2)` for an angle in `[0, pi]` given its cosine.
/// The cosine is clamped to `[-1, 1]` first so rounding noise never yields `NaN`.
pub fn sin_from_cos(cos_a: f64) -> f64 {
    let c = cos_a.clamp(-1.0, 1.0);
    (1.0 - c * c).max(0.0).sqrt()
}

/// Sign function treating zero as positive.
pub fn sign(value: f64) -> f64 { if value < 0.0 { -1.0 } else { 1.0 } }
