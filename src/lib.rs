//! The main library module for thinklink
//!
//! A semantic proximity gate for word-association games: decides whether a
//! player's word is related to, but not a trivial variant of, a target word.
pub mod config;
pub mod error;
pub mod gate;
pub mod io;
#[cfg(feature = "http-server")]
pub mod server;
pub mod vector;

// Explicit exports for better API clarity
pub use config::Settings;
pub use error::{GateError, GateResult, StoreError, StoreResult};
pub use gate::{Decision, DecisionEngine, ThresholdPolicy, Token};
pub use vector::{VectorStore, WordVectors};
