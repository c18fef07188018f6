//! Error types for A.v.A
//!
//! Bad user input (`Format`, `Learning`) is always recovered locally and turned
//! into a reply. Everything else bubbles up to the per-turn loop, which records
//! it in the error journal and keeps the session alive.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the A.v.A core
#[derive(Error, Debug)]
pub enum AvaError {
    /// Malformed learning directive (missing `=` separator, empty sides)
    #[error("Malformed learning directive: {0}")]
    Format(String),

    /// A well-formed directive that could not be applied
    #[error("Learning failed: {0}")]
    Learning(String),

    /// The memory store could not be read or durably written
    #[error("Persistence failure at {path}: {reason}")]
    Persistence { path: PathBuf, reason: String },

    /// Unexpected fault inside the per-turn pipeline
    #[error("Resolution error: {0}")]
    Resolution(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AvaError {
    /// Build a persistence error for `path`
    pub fn persistence(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        AvaError::Persistence {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Errors caused by user input that never end a turn abnormally
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self, AvaError::Format(_) | AvaError::Learning(_))
    }

    /// The store could not be durably recorded
    pub fn is_persistence(&self) -> bool {
        matches!(self, AvaError::Persistence { .. })
    }
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, AvaError>;
