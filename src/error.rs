//! Error types for the semantic proximity gate
//!
//! This module provides structured error types using thiserror. The gate
//! itself never surfaces these to an interactive caller (see
//! [`DecisionEngine::decide`](crate::gate::DecisionEngine::decide)), but they
//! stay distinct internally so callers and tests can tell the failure kinds
//! apart.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while evaluating a single decision
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GateError {
    /// Token is not part of the embedding vocabulary
    #[error("Word '{token}' is not in the embedding vocabulary")]
    UnknownToken { token: String },

    /// Vector has zero norm, so cosine similarity is undefined
    #[error("Vector for '{token}' has zero norm")]
    DegenerateVector { token: String },

    /// Two vectors drawn for one comparison disagree on dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Threshold policy bounds are unusable
    #[error("Invalid threshold policy: {reason}")]
    InvalidPolicy { reason: String },
}

impl GateError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::UnknownToken { .. } => "UNKNOWN_TOKEN",
            Self::DegenerateVector { .. } => "DEGENERATE_VECTOR",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::InvalidPolicy { .. } => "INVALID_POLICY",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::UnknownToken { .. } => vec![
                "Try a more common single word",
                "Raise vectors.max_words if the vocabulary was truncated",
            ],
            Self::DegenerateVector { .. } | Self::DimensionMismatch { .. } => vec![
                "The vector file may be corrupted, regenerate it with 'thinklink convert'",
            ],
            Self::InvalidPolicy { .. } => vec![
                "Check the [gate] section: 0 <= min_threshold <= max_threshold <= 1",
                "score_cap must be greater than zero",
            ],
        }
    }
}

/// Errors raised while loading or persisting word vectors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access vector file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed vector entry on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Vector on line {line} has {actual} components, expected {expected}")]
    DimensionMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid vector cache format: {0}")]
    InvalidFormat(String),

    #[error("Vector file contains no entries")]
    Empty,
}

impl StoreError {
    /// Get a stable status code for this error type.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "IO_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::DimensionMismatch { .. } => "DIMENSION_MISMATCH",
            Self::InvalidFormat(_) => "INVALID_FORMAT",
            Self::Empty => "EMPTY_VOCABULARY",
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::Io { .. } => vec![
                "Check that vectors.path points to an existing file",
                "Download glove.6B.100d.txt from https://nlp.stanford.edu/projects/glove/",
            ],
            Self::Parse { .. } | Self::DimensionMismatch { .. } => vec![
                "Expected GloVe text format: one 'word v1 v2 ... vd' entry per line",
            ],
            Self::InvalidFormat(_) => vec![
                "Delete the cache and rebuild it with 'thinklink convert'",
            ],
            Self::Empty => vec!["The vector file is empty or max_words is zero"],
        }
    }
}

/// Result type alias for gate operations
pub type GateResult<T> = Result<T, GateError>;

/// Result type alias for vector store loading
pub type StoreResult<T> = Result<T, StoreError>;

/// Helper trait for attaching a path to I/O errors
pub trait ErrorContext<T> {
    /// Wrap an I/O error with the path it occurred on
    fn with_path(self, path: &std::path::Path) -> StoreResult<T>;
}

impl<T> ErrorContext<T> for Result<T, std::io::Error> {
    fn with_path(self, path: &std::path::Path) -> StoreResult<T> {
        self.map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}
