//! Project context resolution
//!
//! Locates the isolated bundle directory and manifest file for a project.
//! The isolated bundle lives in a fixed subdirectory of the project root
//! and carries its own copy of the project's manifest.

use std::path::{Path, PathBuf};

/// Directory holding the isolated bundle, relative to the project root
pub const ISOLATED_DIR_NAME: &str = ".ruby-lsp";

/// Manifest name used when the project has none of its own
pub const DEFAULT_MANIFEST: &str = "Gemfile";

// Manifest basenames Bundler recognizes, in discovery order
const MANIFEST_CANDIDATES: [&str; 2] = ["Gemfile", "gems.rb"];

/// Resolved paths for one update invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    /// Project root directory
    pub root: PathBuf,
    /// Directory holding the isolated bundle
    pub isolated_dir: PathBuf,
    /// Basename of the manifest the isolated bundle uses
    pub manifest_name: String,
    /// The project's own manifest, when one was discoverable
    pub project_manifest: Option<PathBuf>,
    /// Manifest file inside the isolated bundle
    pub isolated_manifest: PathBuf,
}

impl ProjectContext {
    /// Resolve the context for a project root
    ///
    /// A project without a discoverable manifest is not an error: the
    /// manifest name falls back to `Gemfile` and `project_manifest`
    /// stays empty.
    pub fn resolve(root: &Path) -> Self {
        let isolated_dir = root.join(ISOLATED_DIR_NAME);

        let project_manifest = MANIFEST_CANDIDATES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file());

        let manifest_name = project_manifest
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| DEFAULT_MANIFEST.to_string());

        let isolated_manifest = isolated_dir.join(&manifest_name);

        Self {
            root: root.to_path_buf(),
            isolated_dir,
            manifest_name,
            project_manifest,
            isolated_manifest,
        }
    }

    /// Whether the isolated bundle has been set up
    pub fn bundle_exists(&self) -> bool {
        self.isolated_dir.is_dir() && self.isolated_manifest.is_file()
    }
}
