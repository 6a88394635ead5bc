//! Memory-mapped binary cache for word vectors.
//!
//! Parsing a large GloVe text file dominates start-up time. The cache stores
//! the already-parsed vectors so later starts only copy bytes.
//!
//! # Storage Format
//!
//! - Header (16 bytes): magic `TLWV`, version, dimension, word count
//! - Vectors: `count * dimension` contiguous f32 values, little-endian
//! - Words: `count` UTF-8 words, each terminated by `\n`
//!
//! All header integers are little-endian u32.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use memmap2::{Mmap, MmapOptions};
use tracing::info;

use crate::error::{ErrorContext, StoreError, StoreResult};
use crate::vector::{VectorDimension, VectorStore, WordVectors};

/// Current storage format version.
const STORAGE_VERSION: u32 = 1;

/// Size of the storage header in bytes.
const HEADER_SIZE: usize = 16;

/// Magic bytes to identify vector cache files.
const MAGIC_BYTES: &[u8; 4] = b"TLWV";

/// Number of bytes per f32 value.
const BYTES_PER_F32: usize = 4;

impl WordVectors {
    /// Write the store to a binary cache file.
    pub fn save_cache(&self, path: &Path) -> StoreResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_path(parent)?;
        }

        let count = u32::try_from(self.len()).map_err(|_| {
            StoreError::InvalidFormat(format!("too many words for cache: {}", self.len()))
        })?;
        let dimension = u32::try_from(self.dimension().get()).map_err(|_| {
            StoreError::InvalidFormat(format!("dimension too large: {}", self.dimension()))
        })?;

        // Words are newline-terminated on disk
        if let Some(word) = self.words().find(|w| w.contains('\n')) {
            return Err(StoreError::InvalidFormat(format!(
                "word {word:?} contains a newline and cannot be cached"
            )));
        }

        let file = File::create(path).with_path(path)?;
        let mut writer = BufWriter::new(file);

        // Header
        writer.write_all(MAGIC_BYTES).with_path(path)?;
        writer.write_all(&STORAGE_VERSION.to_le_bytes()).with_path(path)?;
        writer.write_all(&dimension.to_le_bytes()).with_path(path)?;
        writer.write_all(&count.to_le_bytes()).with_path(path)?;

        // Vectors, row order
        for (_, vector) in self.iter() {
            for &value in vector {
                writer.write_all(&value.to_le_bytes()).with_path(path)?;
            }
        }

        // Words, row order
        for word in self.words() {
            writer.write_all(word.as_bytes()).with_path(path)?;
            writer.write_all(b"\n").with_path(path)?;
        }

        writer.flush().with_path(path)?;
        info!("Saved {} words to cache {}", self.len(), path.display());
        Ok(())
    }

    /// Load a store previously written by [`WordVectors::save_cache`].
    pub fn load_cache(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).with_path(path)?;
        let mmap = unsafe { MmapOptions::new().map(&file).with_path(path)? };

        let (dimension, count) = read_header(&mmap)?;
        let dim = dimension.get();

        let vectors_len = count
            .checked_mul(dim)
            .and_then(|n| n.checked_mul(BYTES_PER_F32))
            .ok_or_else(|| StoreError::InvalidFormat("header sizes overflow".to_string()))?;
        let words_offset = HEADER_SIZE + vectors_len;
        if mmap.len() < words_offset {
            return Err(StoreError::InvalidFormat(format!(
                "expected {vectors_len} bytes of vector data, file holds {}",
                mmap.len().saturating_sub(HEADER_SIZE)
            )));
        }

        let words_block = std::str::from_utf8(&mmap[words_offset..])
            .map_err(|e| StoreError::InvalidFormat(format!("word list is not UTF-8: {e}")))?;
        let words: Vec<&str> = words_block
            .strip_suffix('\n')
            .map(|block| block.split('\n').collect())
            .unwrap_or_default();
        if words.len() != count {
            return Err(StoreError::InvalidFormat(format!(
                "header declares {count} words, found {}",
                words.len()
            )));
        }

        let mut store = Self::with_dimension(dimension);
        store.reserve(count);
        let mut row = Vec::with_capacity(dim);
        let vector_bytes = &mmap[HEADER_SIZE..words_offset];

        for (index, (word, chunk)) in words
            .iter()
            .zip(vector_bytes.chunks_exact(dim * BYTES_PER_F32))
            .enumerate()
        {
            row.clear();
            row.extend(
                chunk
                    .chunks_exact(BYTES_PER_F32)
                    .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
            if !store.push(word, &row, index + 1)? {
                return Err(StoreError::InvalidFormat(format!(
                    "duplicate word '{word}' in cache"
                )));
            }
        }

        if store.is_empty() {
            return Err(StoreError::Empty);
        }

        info!(
            "Loaded {} words ({}-dimensional) from cache {}",
            store.len(),
            dimension,
            path.display()
        );
        Ok(store)
    }
}

fn read_header(mmap: &Mmap) -> StoreResult<(VectorDimension, usize)> {
    if mmap.len() < HEADER_SIZE {
        return Err(StoreError::InvalidFormat(
            "File too small to contain header".to_string(),
        ));
    }

    if &mmap[0..4] != MAGIC_BYTES {
        return Err(StoreError::InvalidFormat("Invalid magic bytes".to_string()));
    }

    let version = u32::from_le_bytes([mmap[4], mmap[5], mmap[6], mmap[7]]);
    if version != STORAGE_VERSION {
        return Err(StoreError::InvalidFormat(format!(
            "unsupported cache version {version}, expected {STORAGE_VERSION}"
        )));
    }

    let dim_value = u32::from_le_bytes([mmap[8], mmap[9], mmap[10], mmap[11]]);
    let dimension = VectorDimension::new(dim_value as usize)
        .ok_or_else(|| StoreError::InvalidFormat("dimension is zero".to_string()))?;

    let count = u32::from_le_bytes([mmap[12], mmap[13], mmap[14], mmap[15]]) as usize;

    Ok((dimension, count))
}
