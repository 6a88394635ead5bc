//! Cosine similarity between embedding vectors

use crate::error::{GateError, GateResult};

/// Calculate cosine similarity between two vectors.
///
/// Components are accumulated in `f64` and the result is clamped into
/// `[-1.0, 1.0]` to absorb rounding. The norm product is taken as
/// `sqrt(|a|² · |b|²)`, so vectors with exact squared norms give exact
/// results.
///
/// # Errors
/// - [`GateError::DimensionMismatch`] if the slices differ in length
/// - [`GateError::DegenerateVector`] if either vector has zero norm or a
///   non-finite component (the token reported is `"a"` or `"b"`; callers
///   rename it)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> GateResult<f64> {
    if a.len() != b.len() {
        return Err(GateError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let (dot, norm_a, norm_b) = a.iter().zip(b.iter()).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    // NaN or infinite components poison every sum they touch
    if norm_a == 0.0 || !norm_a.is_finite() {
        return Err(GateError::DegenerateVector {
            token: "a".to_string(),
        });
    }
    if norm_b == 0.0 || !norm_b.is_finite() || !dot.is_finite() {
        return Err(GateError::DegenerateVector {
            token: "b".to_string(),
        });
    }

    Ok((dot / (norm_a * norm_b).sqrt()).clamp(-1.0, 1.0))
}
