//! The decision engine: composes normalization, lookup, similarity and the
//! adaptive threshold into a single accept/reject answer.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GateError, GateResult};
use crate::gate::{ThresholdPolicy, cosine_similarity, is_degenerate, normalize};
use crate::vector::VectorStore;

/// Outcome of one gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether the candidate passed the gate
    pub accepted: bool,

    /// Raw cosine similarity, `0.0` when the candidate was filtered out
    pub score: f64,
}

impl Decision {
    /// The uniform non-match answer.
    #[must_use]
    pub const fn rejected() -> Self {
        Self {
            accepted: false,
            score: 0.0,
        }
    }

    /// Points a game client awards for this decision: the similarity scaled
    /// to a percentage, or nothing if the word was not accepted.
    #[must_use]
    pub fn points(&self) -> u32 {
        if !self.accepted {
            return 0;
        }
        // Accepted scores exceed a non-negative threshold, so this is in 0..=100
        (self.score * 100.0).round().clamp(0.0, 100.0) as u32
    }
}

/// Judges whether a candidate word is related to, but not a trivial variant
/// of, a target word.
///
/// The engine holds no per-request state. Cloning it clones the `Arc` to the
/// store, so one loaded vocabulary serves every handler.
pub struct DecisionEngine<S: VectorStore + ?Sized> {
    store: Arc<S>,
    policy: ThresholdPolicy,
}

impl<S: VectorStore + ?Sized> Clone for DecisionEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            policy: self.policy,
        }
    }
}

impl<S: VectorStore + ?Sized> std::fmt::Debug for DecisionEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("vocabulary", &self.store.len())
            .field("dimension", &self.store.dimension())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<S: VectorStore + ?Sized> DecisionEngine<S> {
    pub fn new(store: Arc<S>, policy: ThresholdPolicy) -> Self {
        Self { store, policy }
    }

    /// Engine with the default 0.3 → 0.5 threshold curve.
    pub fn with_default_policy(store: Arc<S>) -> Self {
        Self::new(store, ThresholdPolicy::default())
    }

    #[must_use]
    pub fn policy(&self) -> &ThresholdPolicy {
        &self.policy
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Decide whether `candidate` is an acceptable association for `target`.
    ///
    /// Never fails: unknown words and degenerate vectors come back as
    /// [`Decision::rejected`]. Use [`DecisionEngine::evaluate`] to see which
    /// failure occurred.
    pub fn decide(&self, target: &str, candidate: &str, accumulated_score: f64) -> Decision {
        match self.evaluate(target, candidate, accumulated_score) {
            Ok(decision) => decision,
            Err(e) => {
                debug!(code = e.status_code(), "gate folded error into non-match: {e}");
                Decision::rejected()
            }
        }
    }

    /// Same algorithm as [`DecisionEngine::decide`] with lookup and
    /// similarity failures reported instead of folded.
    ///
    /// Degenerate inputs (identity, containment, empty) are not errors; they
    /// return `Ok(Decision::rejected())` without touching the store.
    pub fn evaluate(
        &self,
        target: &str,
        candidate: &str,
        accumulated_score: f64,
    ) -> GateResult<Decision> {
        let target = normalize(target);
        let candidate = normalize(candidate);

        if is_degenerate(&target, &candidate) {
            debug!(%target, %candidate, "degenerate candidate rejected");
            return Ok(Decision::rejected());
        }

        let target_vector = self.store.lookup(&target)?;
        let candidate_vector = self.store.lookup(&candidate)?;
        let dimension = self.store.dimension();
        dimension.validate_vector(target_vector)?;
        dimension.validate_vector(candidate_vector)?;

        let score = cosine_similarity(target_vector, candidate_vector).map_err(|e| match e {
            GateError::DegenerateVector { token } => GateError::DegenerateVector {
                token: if token == "a" {
                    target.to_string()
                } else {
                    candidate.to_string()
                },
            },
            other => other,
        })?;

        let threshold = self.policy.threshold(accumulated_score);
        let accepted = score > threshold;
        debug!(%target, %candidate, score, threshold, accepted, "gate decision");

        Ok(Decision { accepted, score })
    }
}
