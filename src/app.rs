//! Application startup and utilities.
//!
//! This module contains exit codes, tracing setup, and error hints
//! that support the main entry point.

use std::backtrace::Backtrace;
use std::error::Error;

use radvd_regen::config::{ConfigError, field};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Application exit codes.
///
/// Dispatcher hooks only distinguish success from failure, so every fatal
/// condition maps to 1.
pub mod exit_code {
    use std::process::ExitCode;

    /// Success or intentionally skipped run (exit code 0).
    pub const SUCCESS: ExitCode = ExitCode::SUCCESS;

    /// Configuration error (exit code 1) - invalid args, unreadable config file, etc.
    pub const CONFIG_ERROR: ExitCode = ExitCode::FAILURE;

    /// Runtime error (exit code 1) - unreadable template, bad header, failed write, etc.
    pub const RUNTIME_ERROR: ExitCode = ExitCode::FAILURE;
}

/// Prints helpful hints for common configuration errors.
pub fn print_config_hint(error: &ConfigError) {
    match error {
        ConfigError::MissingRequired { field: f, .. } => {
            if *f == field::INTERFACE || *f == field::EVENT {
                eprintln!("\nUsage: radvd-regen [OPTIONS] <INTERFACE> <EVENT>");
            }
        }
        ConfigError::FileRead { .. } => {
            eprintln!("\nRun 'radvd-regen init' to generate a configuration template.");
        }
        _ => {}
    }
}

/// Prints a fatal error, plus a backtrace when `debug` is set.
///
/// Error messages already embed their source, so the chain is not walked.
pub fn print_fatal(error: &dyn Error, debug: bool) {
    eprintln!("Error: {error}");

    if debug {
        eprintln!("\nBacktrace:\n{}", Backtrace::force_capture());
    }
}

/// Returns the default log level for the given verbosity flags.
#[must_use]
pub const fn log_level(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::TRACE
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Sets up the tracing subscriber for logging.
pub fn setup_tracing(verbose: bool, debug: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(log_level(verbose, debug).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
