//! Cosine similarity between embedding vectors.

use crate::error::{RagError, Result};

/// Compute the cosine similarity `dot(a, b) / (‖a‖ · ‖b‖)`.
///
/// Returns `Ok(None)` when the similarity is undefined: either vector has zero
/// magnitude, or the inputs contain non-finite values. Defined results are
/// clamped into `[-1, 1]` to absorb floating-point drift.
///
/// Sums are accumulated in `f64`, where the square of any finite `f32` is
/// finite and non-zero, so very large or very small components still score.
///
/// # Errors
///
/// Returns [`RagError::DimensionMismatch`] if `a` and `b` differ in length.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<Option<f32>> {
    if a.len() != b.len() {
        return Err(RagError::DimensionMismatch { expected: a.len(), actual: b.len() });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(None);
    }

    let similarity = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !similarity.is_finite() {
        return Ok(None);
    }
    Ok(Some(similarity.clamp(-1.0, 1.0) as f32))
}
