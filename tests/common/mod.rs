#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use thinklink::{DecisionEngine, ThresholdPolicy, WordVectors};

/// Small GloVe-format vocabulary with known cosines:
/// - ocean/sea: 0.6
/// - north/south: exactly 0.5
/// - ocean/cat: 0.0
pub const FIXTURE_GLOVE: &str = "\
ocean 1.0 0.0 0.0 0.0
sea 0.6 0.8 0.0 0.0
north 1.0 1.0 0.0 0.0
south 1.0 0.0 1.0 0.0
cat 0.0 0.0 1.0 0.0
cats 0.0 0.0 0.9 0.1
kitten 0.0 0.3 0.9 0.1
";

pub struct TestVectors {
    pub dir: TempDir,
}

impl TestVectors {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn add_file(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        fs::write(&file_path, content).expect("Failed to write file");
        file_path
    }

    /// Write the fixture vocabulary as GloVe text.
    pub fn glove(&self) -> PathBuf {
        self.add_file("fixture.4d.txt", FIXTURE_GLOVE)
    }
}

pub fn fixture_store() -> WordVectors {
    WordVectors::from_glove_reader(FIXTURE_GLOVE.as_bytes(), None)
        .expect("Failed to parse fixture vectors")
}

/// Engine over the fixture vocabulary with the default 0.3 → 0.5 curve.
pub fn fixture_engine() -> DecisionEngine<WordVectors> {
    DecisionEngine::with_default_policy(Arc::new(fixture_store()))
}

pub fn engine_with_policy(policy: ThresholdPolicy) -> DecisionEngine<WordVectors> {
    DecisionEngine::new(Arc::new(fixture_store()), policy)
}
