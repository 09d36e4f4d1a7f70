//! Guarded vector normalization.
//!
//! `glam::DVec3::normalize` divides by the length unconditionally, which
//! turns a zero vector into NaNs that silently poison every later round.
//! Every normalization in the design pipeline goes through here instead.

use glam::DVec3;
use refrax_types::{RefraxError, RefraxResult};

/// Normalize `v`, failing with [`RefraxError::DegenerateGeometry`] when its
/// length is below `epsilon` (or not finite).
///
/// `index` and `context` identify the offending sample in the error.
pub fn normalize_or_degenerate(
    v: DVec3,
    epsilon: f64,
    index: usize,
    context: &str,
) -> RefraxResult<DVec3> {
    let len = v.length();
    if !len.is_finite() || len < epsilon {
        return Err(RefraxError::DegenerateGeometry {
            index,
            context: format!("{context} has length {len:.3e} (minimum {epsilon:.1e})"),
        });
    }
    Ok(v / len)
}
