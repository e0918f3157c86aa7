//! Update outcome types
//!
//! One update produces either success or a classified failure carrying
//! the fields needed for actionable reporting.

use thiserror::Error;

/// Result of one isolated-bundle update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The update completed and the bundle was written
    Success,
    /// The update did not complete; the kind says why
    Failure(FailureKind),
}

impl UpdateOutcome {
    /// Whether the update succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, UpdateOutcome::Success)
    }
}

/// Classified failure kinds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// The update is blocked by an incompatible requirement elsewhere
    /// in the project
    #[error("{gem_name} is held back: required {constraint}, but the latest version is {available_version}")]
    ConstraintViolation {
        gem_name: String,
        constraint: String,
        available_version: String,
    },

    /// A requested gem could not be found in any source
    #[error("gem not found: {message}")]
    GemNotFound { message: String },

    /// A git-sourced dependency failed
    #[error("git error: {message}")]
    GitError { message: String },

    /// Bundler could not resolve compatible versions
    #[error("version conflict: {message}")]
    VersionConflict { message: String },

    /// No success marker and no recognizable pattern in the output
    #[error("{reason}")]
    UpdateFailed { reason: String },
}
