//! Exit codes for CLI operations following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - operation completed (for `check`, the word was accepted)
//! - `1`: General error - unspecified failure
//! - `3`: Not found - the candidate was rejected
//! - `5-7`: Specific recoverable errors
//! - `126-255`: Reserved by shell

use crate::error::{GateError, StoreError};

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Candidate rejected, but the command itself ran fine (code 3)
    NotFound = 3,

    /// File I/O error (code 5)
    IoError = 5,

    /// Configuration error (code 6)
    ConfigError = 6,

    /// Vector file is malformed (code 7)
    InvalidData = 7,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl ExitCode {
    /// Exit code for a gate decision: `Success` if accepted, `NotFound` if not.
    pub fn from_decision(accepted: bool) -> Self {
        if accepted {
            ExitCode::Success
        } else {
            ExitCode::NotFound
        }
    }

    /// Convert a `StoreError` to the appropriate exit code.
    pub fn from_store_error(error: &StoreError) -> Self {
        match error {
            StoreError::Io { .. } => ExitCode::IoError,
            StoreError::Parse { .. }
            | StoreError::DimensionMismatch { .. }
            | StoreError::InvalidFormat(_)
            | StoreError::Empty => ExitCode::InvalidData,
        }
    }

    /// Convert a `GateError` to the appropriate exit code.
    pub fn from_gate_error(error: &GateError) -> Self {
        match error {
            GateError::InvalidPolicy { .. } => ExitCode::ConfigError,
            GateError::UnknownToken { .. } => ExitCode::NotFound,
            GateError::DegenerateVector { .. } | GateError::DimensionMismatch { .. } => {
                ExitCode::InvalidData
            }
        }
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

    /// Get a human-readable description of the exit code.
    pub fn description(&self) -> &str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::GeneralError => "General error",
            ExitCode::NotFound => "Not found",
            ExitCode::IoError => "I/O error",
            ExitCode::ConfigError => "Configuration error",
            ExitCode::InvalidData => "Invalid vector data",
        }
    }
}
