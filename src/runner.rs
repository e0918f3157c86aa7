//! Update execution against the isolated bundle
//!
//! Snapshots the process environment, overlays the composed Bundler
//! settings, runs the update for the fixed gem list, and restores the
//! environment on every exit path before handing the captured output to
//! the classifier.

use crate::classifier;
use crate::context::ProjectContext;
use crate::env::EnvOverlay;
use crate::error::AppError;
use crate::outcome::{FailureKind, UpdateOutcome};
use std::collections::BTreeMap;
use std::process::Command;

/// Gems the isolated bundle update targets
///
/// The set is fixed: the language server and its companion. Everything
/// else in the isolated bundle only moves as far as conservative
/// resolution requires.
pub const UPDATED_GEMS: [&str; 2] = ["ruby-lsp", "debug"];

/// Seam for invoking Bundler's update routine
pub trait BundlerRunner {
    /// Run the update for the fixed gem list, returning the combined
    /// text of both standard streams
    fn run_update(&self, context: &ProjectContext) -> std::io::Result<String>;
}

/// Runner that executes the real `bundle` command
///
/// The child process inherits the overlaid environment, so the composed
/// `BUNDLE_*` settings reach Bundler without touching its command line.
#[derive(Debug, Default)]
pub struct SystemBundler;

impl SystemBundler {
    /// Create a new system bundler runner
    pub fn new() -> Self {
        Self
    }
}

impl BundlerRunner for SystemBundler {
    fn run_update(&self, context: &ProjectContext) -> std::io::Result<String> {
        let output = Command::new("bundle")
            .arg("update")
            .args(UPDATED_GEMS)
            .arg("--conservative")
            .current_dir(&context.root)
            .output()?;

        let mut captured = String::from_utf8_lossy(&output.stdout).into_owned();
        captured.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(captured)
    }
}

/// Run one update under the composed environment
///
/// The isolated bundle must already exist; a missing bundle is a usage
/// error and the update is never invoked. Whatever the invocation does,
/// the process environment is restored before this function returns.
pub fn run_update<R: BundlerRunner>(
    runner: &R,
    context: &ProjectContext,
    env_map: &BTreeMap<String, String>,
) -> Result<UpdateOutcome, AppError> {
    if !context.bundle_exists() {
        return Err(AppError::usage(&context.isolated_dir));
    }

    let _environment = EnvOverlay::apply(env_map);
    // The frozen check is lifted only while this call is on the stack
    let frozen_relax = BTreeMap::from([("BUNDLE_FROZEN".to_string(), "false".to_string())]);
    let _frozen = EnvOverlay::apply(&frozen_relax);

    let outcome = match runner.run_update(context) {
        Ok(captured) => classifier::classify(&captured),
        Err(e) => UpdateOutcome::Failure(FailureKind::UpdateFailed {
            reason: format!("failed to run bundler: {}", e),
        }),
    };

    Ok(outcome)
}
