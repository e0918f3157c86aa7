//! Bundler version pin resolution
//!
//! Reads the `BUNDLED WITH` section of the project lockfile to determine
//! which Bundler version produced it, so the update runs under the same
//! version. Pin resolution is best-effort: any problem is reported as a
//! warning and the update proceeds unpinned.

use crate::context::ProjectContext;
use colored::Colorize;
use regex::Regex;
use std::path::PathBuf;
use std::sync::LazyLock;

// Section header Bundler writes above its own version
const BUNDLED_WITH: &str = "BUNDLED WITH";

// Version line: 2.5.4, 2.6.0.dev, etc.
static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)*(?:\.[0-9A-Za-z]+)*$").unwrap());

/// Lockfile name for a given manifest basename
fn lockfile_name(manifest: &str) -> &'static str {
    match manifest {
        "gems.rb" => "gems.locked",
        _ => "Gemfile.lock",
    }
}

/// Companion lockfile path beside the project manifest, if any
pub fn lockfile_path(context: &ProjectContext) -> Option<PathBuf> {
    let manifest = context.project_manifest.as_ref()?;
    let dir = manifest.parent()?;
    let name = manifest.file_name()?.to_str()?;
    Some(dir.join(lockfile_name(name)))
}

/// Resolve the Bundler version pin for the project
pub fn resolve_version_pin(context: &ProjectContext) -> Option<String> {
    let path = lockfile_path(context)?;
    if !path.is_file() {
        return None;
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => {
            let version = parse_bundled_with(&content);
            if version.is_none() {
                eprintln!(
                    "{} no Bundler version recorded in {}; updating without a pin",
                    "warning:".yellow(),
                    path.display()
                );
            }
            version
        }
        Err(e) => {
            eprintln!(
                "{} could not read {}: {}; updating without a pin",
                "warning:".yellow(),
                path.display(),
                e
            );
            None
        }
    }
}

/// Extract the version recorded under `BUNDLED WITH`
///
/// The version sits on the first non-empty line after the section header.
pub fn parse_bundled_with(content: &str) -> Option<String> {
    let mut lines = content.lines();
    while let Some(line) = lines.next() {
        if line.trim() != BUNDLED_WITH {
            continue;
        }
        for next in lines.by_ref() {
            let candidate = next.trim();
            if candidate.is_empty() {
                continue;
            }
            if VERSION_RE.is_match(candidate) {
                return Some(candidate.to_string());
            }
            return None;
        }
    }
    None
}
