//! Type-safe wrappers for the embedding space.

use crate::error::{GateError, GateResult};
use std::num::NonZeroUsize;

/// Type-safe wrapper for vector dimensions.
///
/// Every vector in one store shares a single dimension; the wrapper keeps
/// zero-dimensional spaces unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorDimension(NonZeroUsize);

impl VectorDimension {
    /// Creates a new `VectorDimension`.
    ///
    /// Returns `None` if the dimension is zero.
    #[must_use]
    pub fn new(dim: usize) -> Option<Self> {
        NonZeroUsize::new(dim).map(Self)
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0.get()
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> GateResult<()> {
        if vector.len() != self.get() {
            return Err(GateError::DimensionMismatch {
                expected: self.get(),
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl std::fmt::Display for VectorDimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
