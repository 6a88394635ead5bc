//! Token to vector lookup over a fixed embedding space.
//!
//! [`VectorStore`] is the seam between the decision engine and whatever
//! holds the embeddings. [`WordVectors`] is the in-process implementation:
//! a flat `f32` buffer plus a word index, built once at start-up and only
//! read afterwards.

use crate::error::{GateError, GateResult, StoreError, StoreResult};
use crate::gate::{Token, normalize};
use crate::vector::VectorDimension;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::path::Path;

/// File extension of the binary vector cache.
pub const CACHE_EXTENSION: &str = "tlwv";

/// Read-only access to an embedding vocabulary.
///
/// Implementations must be safe for concurrent readers: the engine shares a
/// single store across every request handler.
pub trait VectorStore: Send + Sync {
    /// Look up the vector for a token.
    ///
    /// # Errors
    /// Returns [`GateError::UnknownToken`] if the token is not in the
    /// vocabulary.
    fn lookup(&self, token: &Token) -> GateResult<&[f32]>;

    /// Dimension shared by every vector in the store.
    fn dimension(&self) -> VectorDimension;

    /// Number of words in the vocabulary.
    fn len(&self) -> usize;

    /// Whether the vocabulary is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a token exists without borrowing its vector.
    fn contains(&self, token: &Token) -> bool {
        self.lookup(token).is_ok()
    }
}

/// In-memory word vectors.
pub struct WordVectors {
    /// Word to row index into `data`
    index: HashMap<String, usize>,

    /// Words in insertion order (row order)
    words: Vec<String>,

    /// Row-major vectors, `words.len() * dimension` values
    data: Vec<f32>,

    dimension: VectorDimension,
}

impl std::fmt::Debug for WordVectors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordVectors")
            .field("words", &self.words.len())
            .field("dimension", &self.dimension)
            .finish()
    }
}

impl WordVectors {
    /// Build a store from `(word, vector)` pairs.
    ///
    /// Words are normalized the same way gate inputs are. The first vector
    /// fixes the dimension; when a word repeats, its first vector wins.
    ///
    /// # Errors
    /// - [`StoreError::Empty`] if no pairs are given
    /// - [`StoreError::Parse`] if the first vector has no components
    /// - [`StoreError::DimensionMismatch`] if a later vector disagrees
    ///
    /// Reported line numbers are 1-based positions in the input.
    pub fn from_pairs<I, W>(pairs: I) -> StoreResult<Self>
    where
        I: IntoIterator<Item = (W, Vec<f32>)>,
        W: AsRef<str>,
    {
        let mut pairs = pairs.into_iter().peekable();
        let first_len = match pairs.peek() {
            Some((_, vector)) => vector.len(),
            None => return Err(StoreError::Empty),
        };
        let dimension = VectorDimension::new(first_len).ok_or_else(|| StoreError::Parse {
            line: 1,
            reason: "vector has no components".to_string(),
        })?;

        let mut store = Self::with_dimension(dimension);
        for (position, (word, vector)) in pairs.enumerate() {
            store.push(normalize(word.as_ref()).as_str(), &vector, position + 1)?;
        }

        Ok(store)
    }

    /// Open a vector file, picking the reader from the extension.
    ///
    /// `.tlwv` files are read as binary caches; anything else is parsed as
    /// GloVe text. `max_words` truncates text files only, since caches are
    /// already truncated when written.
    pub fn open(path: &Path, max_words: Option<usize>) -> StoreResult<Self> {
        let is_cache = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(CACHE_EXTENSION));

        if is_cache {
            Self::load_cache(path)
        } else {
            Self::load_glove(path, max_words)
        }
    }

    pub(crate) fn with_dimension(dimension: VectorDimension) -> Self {
        Self {
            index: HashMap::new(),
            words: Vec::new(),
            data: Vec::new(),
            dimension,
        }
    }

    pub(crate) fn reserve(&mut self, words: usize) {
        self.index.reserve(words);
        self.words.reserve(words);
        self.data.reserve(words * self.dimension.get());
    }

    /// Append one entry. Returns `false` if the word was already present.
    pub(crate) fn push(&mut self, word: &str, vector: &[f32], line: usize) -> StoreResult<bool> {
        if vector.len() != self.dimension.get() {
            return Err(StoreError::DimensionMismatch {
                line,
                expected: self.dimension.get(),
                actual: vector.len(),
            });
        }
        if let Some(value) = vector.iter().find(|v| !v.is_finite()) {
            return Err(StoreError::Parse {
                line,
                reason: format!("non-finite component {value} for '{word}'"),
            });
        }

        match self.index.entry(word.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(self.words.len());
                self.words.push(word.to_string());
                self.data.extend_from_slice(vector);
                Ok(true)
            }
        }
    }

    /// Vector for a raw word, if present. The word is not normalized.
    #[must_use]
    pub fn get(&self, word: &str) -> Option<&[f32]> {
        let row = *self.index.get(word)?;
        let dim = self.dimension.get();
        Some(&self.data[row * dim..(row + 1) * dim])
    }

    /// Words in row order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// Iterate `(word, vector)` entries in row order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f32])> {
        self.words
            .iter()
            .map(String::as_str)
            .zip(self.data.chunks_exact(self.dimension.get()))
    }
}

impl VectorStore for WordVectors {
    fn lookup(&self, token: &Token) -> GateResult<&[f32]> {
        self.get(token.as_str())
            .ok_or_else(|| GateError::UnknownToken {
                token: token.to_string(),
            })
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    fn len(&self) -> usize {
        self.words.len()
    }
}
