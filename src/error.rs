//! Application error types using thiserror
//!
//! Only the usage error escapes the update subsystem as an error; every
//! problem the underlying tool reports becomes a classified
//! `UpdateOutcome` instead.

use std::path::PathBuf;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// The isolated bundle has not been set up, so there is nothing to
    /// update
    #[error("no isolated bundle at {path}; start the Ruby LSP once to set it up")]
    Usage { path: PathBuf },
}

impl AppError {
    /// Creates a new Usage error
    pub fn usage(path: impl Into<PathBuf>) -> Self {
        AppError::Usage { path: path.into() }
    }
}
