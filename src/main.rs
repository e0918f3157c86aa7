//! bundleup - Ruby LSP isolated bundle updater CLI
//!
//! Updates the pinned gems inside a project's `.ruby-lsp` bundle without
//! touching the host project's own dependency resolution.

use bundleup::cli::CliArgs;
use bundleup::context::ProjectContext;
use bundleup::error::AppError;
use bundleup::lockfile;
use bundleup::outcome::UpdateOutcome;
use bundleup::progress::Progress;
use bundleup::runner::{self, SystemBundler, UPDATED_GEMS};
use bundleup::settings;
use clap::Parser;
use colored::Colorize;
use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::from(2)
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    if args.verbose {
        eprintln!("bundleup v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Target: {}", args.path.display());
    }

    let context = ProjectContext::resolve(&args.path);
    let version_pin = lockfile::resolve_version_pin(&context);
    if args.verbose {
        match &version_pin {
            Some(version) => eprintln!("Bundler version pin: {}", version),
            None => eprintln!("Bundler version pin: none"),
        }
    }

    let env_map = settings::compose_environment(&context, version_pin.as_deref());

    let mut stdout = io::stdout().lock();
    if !args.quiet {
        writeln!(
            stdout,
            "Updating {} in the isolated bundle with:",
            UPDATED_GEMS.join(", ")
        )?;
        for (key, value) in &env_map {
            writeln!(stdout, "  {}={}", key, value)?;
        }
        stdout.flush()?;
    }

    let mut progress = Progress::new(!args.quiet);
    progress.spinner("Running bundle update...");
    let result = runner::run_update(&SystemBundler::new(), &context, &env_map);
    progress.finish_and_clear();

    match result {
        Ok(UpdateOutcome::Success) => {
            if !args.quiet {
                writeln!(stdout, "{}", "Isolated bundle updated".green())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Ok(UpdateOutcome::Failure(kind)) => {
            eprintln!("{} {}", "Update failed:".red(), kind);
            Ok(ExitCode::FAILURE)
        }
        Err(e @ AppError::Usage { .. }) => {
            eprintln!("{} {}", "Error:".red(), e);
            Ok(ExitCode::from(2))
        }
    }
}
