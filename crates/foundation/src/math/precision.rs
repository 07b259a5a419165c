//! Float canonicalization for emitted markup.
//!
//! Serialized coordinates must be byte-stable for identical inputs, so
//! values are rounded to a fixed number of decimals and `-0.0` is folded
//! into `0.0` before formatting.

/// Canonicalize a floating-point value.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Rounds `v` to `places` decimals and canonicalizes the result.
pub fn round_to(v: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    canonical_f64((v * factor).round() / factor)
}

/// Formats `v` with exactly `places` decimals, never printing `-0.000`.
pub fn format_fixed(v: f64, places: u32) -> String {
    format!("{:.*}", places as usize, round_to(v, places))
}
