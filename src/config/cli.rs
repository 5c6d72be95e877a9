//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::defaults;

/// radvd-regen: radvd configuration regenerator
///
/// Expands the prefix placeholder of a radvd template with the prefixes
/// currently assigned to an interface, and reloads radvd when the published
/// configuration no longer matches. Meant to be called from a network
/// dispatcher hook as `radvd-regen <INTERFACE> <EVENT>`.
#[derive(Debug, Parser)]
#[command(name = "radvd-regen")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Interface that triggered the run (required for run mode)
    #[arg(value_name = "INTERFACE")]
    pub interface: Option<String>,

    /// Event kind reported by the dispatcher (required for run mode)
    #[arg(value_name = "EVENT")]
    pub event: Option<String>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// radvd template containing the prefix placeholder
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Generated radvd configuration file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// radvd pid file used to signal the daemon
    #[arg(long = "pid-file")]
    pub pid_file: Option<PathBuf>,

    /// Relative lifetime difference, in percent, that counts as a change
    #[arg(long, value_name = "PERCENT")]
    pub threshold: Option<u32>,

    /// iproute2 `ip` program used to read interface addresses
    #[arg(long = "ip-command", value_name = "PROGRAM")]
    pub ip_command: Option<String>,

    /// Test mode - compute and log the result without writing or signalling
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Enable trace logging and print backtraces on failure
    #[arg(long, short)]
    pub debug: bool,
}

/// Subcommands for radvd-regen
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = defaults::CONFIG_FILE)]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
