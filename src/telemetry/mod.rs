//! Telemetry for A.v.A
//!
//! Structured logging goes to stderr through `tracing`. Unexpected per-turn
//! faults are additionally appended to an error journal under a short code the
//! user can quote.

use chrono::Utc;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::cli::args::Verbosity;

/// Default filter directive for a verbosity level
pub fn filter_directive(verbosity: Verbosity) -> &'static str {
    match verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::VeryVerbose => "debug",
    }
}

/// Install the global subscriber; `RUST_LOG` takes precedence
pub fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Generate a user-quotable error code, e.g. `ERR-1A2B3C4D`
pub fn error_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("ERR-{}", id[..8].to_uppercase())
}

/// Append-only log of unexpected faults
#[derive(Debug, Clone)]
pub struct ErrorJournal {
    path: Option<PathBuf>,
}

impl ErrorJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Journal that only emits tracing events
    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Record `error` and return its code
    ///
    /// A journal write failure is logged but never replaces the original error.
    pub fn record(&self, error: &dyn std::fmt::Display) -> String {
        let code = error_code();
        tracing::error!(code = %code, error = %error, "turn failed");

        if let Some(path) = &self.path {
            if let Err(e) = self.append(path, &code, error) {
                tracing::warn!(path = %path.display(), error = %e, "could not write error journal");
            }
        }
        code
    }

    fn append(&self, path: &Path, code: &str, error: &dyn std::fmt::Display) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{} [{}] {}", Utc::now().to_rfc3339(), code, error)
    }
}
