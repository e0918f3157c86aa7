//! bundleup - Ruby LSP isolated bundle updater library
//!
//! This library provides the core functionality for updating the pinned
//! gems inside a project's `.ruby-lsp` bundle:
//! - Project context resolution (isolated directory and manifest)
//! - Bundler version pinning from the project lockfile
//! - Environment composition from layered Bundler configuration
//! - Update execution with guaranteed environment restoration
//! - Output classification into actionable outcomes

pub mod classifier;
pub mod cli;
pub mod context;
pub mod env;
pub mod error;
pub mod lockfile;
pub mod outcome;
pub mod progress;
pub mod runner;
pub mod settings;
