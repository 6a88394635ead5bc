//! Word vector storage and lookup.
//!
//! This module owns the embedding space the gate compares words in. The
//! space is loaded once at start-up (from GloVe text or from the binary
//! cache) and is read-only afterwards, so a single [`WordVectors`] can be
//! shared across every request through an `Arc`.

mod glove;
mod storage;
mod store;
mod types;

pub use glove::{GloveEntry, parse_glove_line};
pub use store::{CACHE_EXTENSION, VectorStore, WordVectors};
pub use types::VectorDimension;
