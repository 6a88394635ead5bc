//! Adaptive acceptance threshold.
//!
//! The threshold climbs linearly from `min_threshold` to `max_threshold` as
//! the caller's accumulated score approaches `score_cap`, so the gate gets
//! stricter as a player progresses.

use crate::error::{GateError, GateResult};

/// Threshold at zero progress.
pub const MIN_THRESHOLD: f64 = 0.3;

/// Threshold once the score cap is reached.
pub const MAX_THRESHOLD: f64 = 0.5;

/// Accumulated score at which the threshold saturates.
pub const SCORE_CAP: f64 = 1000.0;

/// Maps an accumulated score to an acceptance threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    min_threshold: f64,
    max_threshold: f64,
    score_cap: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            min_threshold: MIN_THRESHOLD,
            max_threshold: MAX_THRESHOLD,
            score_cap: SCORE_CAP,
        }
    }
}

impl ThresholdPolicy {
    /// Create a policy with custom bounds.
    ///
    /// # Errors
    /// Returns [`GateError::InvalidPolicy`] unless
    /// `0 <= min_threshold <= max_threshold <= 1` and `score_cap > 0`.
    pub fn new(min_threshold: f64, max_threshold: f64, score_cap: f64) -> GateResult<Self> {
        if !(0.0..=1.0).contains(&min_threshold) || !(0.0..=1.0).contains(&max_threshold) {
            return Err(GateError::InvalidPolicy {
                reason: format!(
                    "thresholds must lie in [0, 1], got min={min_threshold}, max={max_threshold}"
                ),
            });
        }
        if min_threshold > max_threshold {
            return Err(GateError::InvalidPolicy {
                reason: format!(
                    "min_threshold ({min_threshold}) exceeds max_threshold ({max_threshold})"
                ),
            });
        }
        if !score_cap.is_finite() || score_cap <= 0.0 {
            return Err(GateError::InvalidPolicy {
                reason: format!("score_cap must be a positive number, got {score_cap}"),
            });
        }

        Ok(Self {
            min_threshold,
            max_threshold,
            score_cap,
        })
    }

    #[must_use]
    pub fn min_threshold(&self) -> f64 {
        self.min_threshold
    }

    #[must_use]
    pub fn max_threshold(&self) -> f64 {
        self.max_threshold
    }

    #[must_use]
    pub fn score_cap(&self) -> f64 {
        self.score_cap
    }

    /// Fraction of the score cap reached, clamped to `[0, 1]`.
    ///
    /// Negative scores count as no progress. NaN is treated the same way.
    #[must_use]
    pub fn progress(&self, accumulated_score: f64) -> f64 {
        let progress = accumulated_score / self.score_cap;
        if progress.is_nan() {
            return 0.0;
        }
        progress.clamp(0.0, 1.0)
    }

    /// Acceptance threshold for the given accumulated score.
    #[must_use]
    pub fn threshold(&self, accumulated_score: f64) -> f64 {
        self.min_threshold
            + (self.max_threshold - self.min_threshold) * self.progress(accumulated_score)
    }
}
