//! Bundler output classification
//!
//! Bundler reports status only through free-form text, so classification
//! is a best-effort scan with an explicit fallback kind:
//! - the literal success marker wins over everything else
//! - a well-formed constraint-violation report is extracted field by field
//! - known Bundler failure markers map to their kinds
//! - anything else is a generic update failure
//!
//! If Bundler's output format drifts, classification degrades to the
//! generic kind rather than erroring.

use crate::outcome::{FailureKind, UpdateOutcome};
use regex::Regex;
use std::sync::LazyLock;

/// Marker Bundler prints after a successful update
pub const SUCCESS_MARKER: &str = "Bundle updated!";

// Gem named by a constraint-violation report
static CONSTRAINT_GEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"could not find compatible versions for gem "([^"]+)""#).unwrap()
});

// Constraint token on the "Required by" line: ~> 2.0, >= 1.2.3, = 4.0
static REQUIRED_BY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Required by.*?((?:~>|>=|<=|!=|[<>=])\s*\d+(?:\.\d+)*)").unwrap()
});

// Newest version the source offers
static LATEST_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"The latest version is (\d+(?:\.\d+)*)").unwrap());

/// Classify captured Bundler output into an outcome
pub fn classify(output: &str) -> UpdateOutcome {
    if output.contains(SUCCESS_MARKER) {
        return UpdateOutcome::Success;
    }

    if let Some(kind) = detect_constraint_violation(output) {
        return UpdateOutcome::Failure(kind);
    }

    if let Some(kind) = detect_known_failure(output) {
        return UpdateOutcome::Failure(kind);
    }

    UpdateOutcome::Failure(FailureKind::UpdateFailed {
        reason: "bundler reported neither success nor a recognizable error".to_string(),
    })
}

/// Extract the constraint-violation fields
///
/// All three fields must be present and well-formed; a partial match is
/// not a constraint violation.
fn detect_constraint_violation(output: &str) -> Option<FailureKind> {
    let gem_name = CONSTRAINT_GEM_RE.captures(output)?.get(1)?.as_str();
    let constraint = REQUIRED_BY_RE.captures(output)?.get(1)?.as_str();
    let available_version = LATEST_VERSION_RE.captures(output)?.get(1)?.as_str();

    Some(FailureKind::ConstraintViolation {
        gem_name: gem_name.to_string(),
        constraint: constraint.to_string(),
        available_version: available_version.to_string(),
    })
}

/// Map distinctive Bundler failure markers to their kinds
fn detect_known_failure(output: &str) -> Option<FailureKind> {
    if let Some(message) = line_containing(output, "Could not find gem") {
        return Some(FailureKind::GemNotFound { message });
    }
    if let Some(message) = line_containing(output, "Git error") {
        return Some(FailureKind::GitError { message });
    }
    if let Some(message) = line_containing(output, "could not find compatible versions") {
        return Some(FailureKind::VersionConflict { message });
    }
    None
}

/// First line of the output containing the marker, trimmed
fn line_containing(output: &str, marker: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains(marker))
        .map(|line| line.trim().to_string())
}
