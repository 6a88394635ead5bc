//! GloVe text format reader.
//!
//! Each non-blank line holds one entry: the word followed by its vector
//! components, separated by single spaces:
//!
//! ```text
//! the 0.418 0.24968 -0.41242 ...
//! ```
//!
//! The dimension is taken from the first entry. Files are frequency sorted,
//! so truncating with `max_words` keeps the most common vocabulary.

use crate::error::{ErrorContext, StoreError, StoreResult};
use crate::vector::{VectorDimension, VectorStore, WordVectors};
use rayon::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Lines read before each parallel parse.
const BATCH_LINES: usize = 65_536;

/// One parsed GloVe line.
#[derive(Debug, Clone, PartialEq)]
pub struct GloveEntry {
    pub word: String,
    pub vector: Vec<f32>,
}

/// Parse a single GloVe line. `line` is the 1-based line number used in
/// error messages.
pub fn parse_glove_line(text: &str, line: usize) -> StoreResult<GloveEntry> {
    let mut fields = text.trim_end().split(' ');

    let word = match fields.next() {
        Some(word) if !word.is_empty() => word.to_lowercase(),
        _ => {
            return Err(StoreError::Parse {
                line,
                reason: "missing word".to_string(),
            });
        }
    };

    let vector = fields
        .map(|field| {
            let value = field.parse::<f32>().map_err(|e| StoreError::Parse {
                line,
                reason: format!("invalid component '{field}': {e}"),
            })?;
            if !value.is_finite() {
                return Err(StoreError::Parse {
                    line,
                    reason: format!("non-finite component '{field}'"),
                });
            }
            Ok(value)
        })
        .collect::<StoreResult<Vec<f32>>>()?;

    if vector.is_empty() {
        return Err(StoreError::Parse {
            line,
            reason: format!("word '{word}' has no vector components"),
        });
    }

    Ok(GloveEntry { word, vector })
}

impl WordVectors {
    /// Load a GloVe text file.
    pub fn load_glove(path: &Path, max_words: Option<usize>) -> StoreResult<Self> {
        info!("Loading GloVe vectors from {}", path.display());
        let file = File::open(path).with_path(path)?;
        let store = Self::from_glove_reader(BufReader::new(file), max_words).map_err(|e| {
            match e {
                StoreError::Io { source, .. } => StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                },
                other => other,
            }
        })?;
        info!(
            "Loaded {} words ({}-dimensional)",
            store.len(),
            store.dimension()
        );
        Ok(store)
    }

    /// Parse GloVe text from any buffered reader.
    ///
    /// Lines are read sequentially in batches, and each batch is parsed in
    /// parallel. `max_words` counts distinct words kept, so duplicates do not
    /// use up the limit.
    pub fn from_glove_reader<R: BufRead>(reader: R, max_words: Option<usize>) -> StoreResult<Self> {
        let limit = max_words.unwrap_or(usize::MAX);
        let mut lines = reader.lines().enumerate();
        let mut store: Option<Self> = None;
        let mut duplicates = 0usize;

        loop {
            let kept = store.as_ref().map_or(0, |s| s.len());
            if kept >= limit {
                break;
            }
            let wanted = (limit - kept).min(BATCH_LINES);

            let mut batch: Vec<(usize, String)> = Vec::new();
            for (index, line) in lines.by_ref() {
                let line = line.with_path(Path::new("<reader>"))?;
                if line.trim().is_empty() {
                    continue;
                }
                batch.push((index + 1, line));
                if batch.len() >= wanted {
                    break;
                }
            }
            if batch.is_empty() {
                break;
            }

            let entries = batch
                .par_iter()
                .map(|(line_no, text)| parse_glove_line(text, *line_no).map(|e| (*line_no, e)))
                .collect::<StoreResult<Vec<_>>>()?;

            // Non-empty vectors are guaranteed by parse_glove_line
            let dimension =
                VectorDimension::new(entries[0].1.vector.len()).ok_or(StoreError::Empty)?;
            let current = store.get_or_insert_with(|| Self::with_dimension(dimension));
            current.reserve(entries.len());
            for (line_no, entry) in &entries {
                if current.len() >= limit {
                    break;
                }
                if !current.push(&entry.word, &entry.vector, *line_no)? {
                    duplicates += 1;
                }
            }
        }

        if duplicates > 0 {
            debug!("Skipped {duplicates} duplicate words");
        }

        store.ok_or(StoreError::Empty)
    }
}
