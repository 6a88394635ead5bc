//! Semantic proximity gate.
//!
//! Given a target word, a candidate word and the caller's running score, the
//! gate answers whether the candidate is "different enough but related
//! enough":
//!
//! 1. [`normalize`] both words and drop [`is_degenerate`] pairs
//! 2. look both words up in a [`VectorStore`](crate::vector::VectorStore)
//! 3. score them with [`cosine_similarity`]
//! 4. compare against [`ThresholdPolicy::threshold`] for the running score
//!
//! [`DecisionEngine`] ties the steps together. Every call is independent;
//! nothing is remembered between decisions.

mod engine;
mod normalize;
mod similarity;
mod threshold;

pub use engine::{Decision, DecisionEngine};
pub use normalize::{Token, is_degenerate, normalize};
pub use similarity::cosine_similarity;
pub use threshold::{MAX_THRESHOLD, MIN_THRESHOLD, SCORE_CAP, ThresholdPolicy};
