//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// Longest interface name the kernel accepts.
const MAX_INTERFACE_LEN: usize = 15;

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct ValidatedConfig {
    /// Interface that triggered the run
    pub interface: String,

    /// Event kind reported by the dispatcher, lowercased
    pub event: String,

    /// radvd template path
    pub template: PathBuf,

    /// Generated configuration path
    pub output: PathBuf,

    /// radvd pid file
    pub pid_file: PathBuf,

    /// Significance threshold in percent
    pub threshold: u32,

    /// Event kinds that trigger a run, lowercased
    pub events: Vec<String>,

    /// iproute2 program
    pub ip_command: String,

    /// Dry-run mode (no write, no signal)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,

    /// Trace logging and backtraces enabled
    pub debug: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Config {{ interface: {}, event: {}, template: {}, output: {}, pid_file: {}, \
             threshold: {}%, events: [{}], ip_command: {}, dry_run: {} }}",
            self.interface,
            self.event,
            self.template.display(),
            self.output.display(),
            self.pid_file.display(),
            self.threshold,
            self.events.join(", "),
            self.ip_command,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `EVENT` is missing
    /// - The event triggers a run and `INTERFACE` is missing or not a valid
    ///   kernel interface name
    /// - The threshold is zero
    /// - The trigger event list is empty or contains a blank entry
    /// - The ip command is empty
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let name = cli.interface.as_deref().ok_or_else(|| {
            ConfigError::missing(field::INTERFACE, "Pass the interface as first argument")
        })?;
        let event = Self::resolve_event(cli)?;
        let events = Self::resolve_events(toml)?;
        // Dispatchers report some events with an empty interface; those leave
        // through the event gate, so the name is only checked when it is used.
        let interface = if events.contains(&event) {
            validate_interface(name)?
        } else {
            name.to_string()
        };

        let paths = toml.map(|t| &t.paths);
        let template = resolve_path(
            cli.template.as_ref(),
            paths.and_then(|p| p.template.as_ref()),
            defaults::TEMPLATE,
        );
        let output = resolve_path(
            cli.output.as_ref(),
            paths.and_then(|p| p.output.as_ref()),
            defaults::OUTPUT,
        );
        let pid_file = resolve_path(
            cli.pid_file.as_ref(),
            paths.and_then(|p| p.pid_file.as_ref()),
            defaults::PID_FILE,
        );

        let threshold = Self::resolve_threshold(cli, toml)?;
        let ip_command = Self::resolve_ip_command(cli, toml)?;

        Ok(Self {
            interface,
            event,
            template,
            output,
            pid_file,
            threshold,
            events,
            ip_command,
            dry_run: cli.dry_run,
            verbose: cli.verbose,
            debug: cli.debug,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_raw(cli, toml.as_ref())
    }

    /// Returns true if the reported event is one that triggers a run.
    #[must_use]
    pub fn is_triggering_event(&self) -> bool {
        self.events.iter().any(|e| *e == self.event)
    }

    fn resolve_event(cli: &Cli) -> Result<String, ConfigError> {
        cli.event
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .ok_or_else(|| {
                ConfigError::missing(field::EVENT, "Pass the event kind as second argument")
            })
    }

    fn resolve_threshold(cli: &Cli, toml: Option<&TomlConfig>) -> Result<u32, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let threshold = cli
            .threshold
            .or_else(|| toml.and_then(|t| t.diff.threshold))
            .unwrap_or(defaults::THRESHOLD);

        if threshold == 0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        Ok(threshold)
    }

    fn resolve_events(toml: Option<&TomlConfig>) -> Result<Vec<String>, ConfigError> {
        let Some(events) = toml.and_then(|t| t.trigger.events.as_ref()) else {
            return Ok(defaults::events());
        };

        if events.is_empty() {
            return Err(ConfigError::InvalidEvents(
                "list must not be empty".to_string(),
            ));
        }

        events
            .iter()
            .map(|e| {
                let e = e.trim();
                if e.is_empty() {
                    Err(ConfigError::InvalidEvents(
                        "entries must not be blank".to_string(),
                    ))
                } else {
                    Ok(e.to_lowercase())
                }
            })
            .collect()
    }

    fn resolve_ip_command(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let command = cli
            .ip_command
            .as_deref()
            .or_else(|| toml.and_then(|t| t.probe.ip_command.as_deref()))
            .unwrap_or(defaults::IP_COMMAND);

        if command.trim().is_empty() {
            return Err(ConfigError::InvalidIpCommand);
        }
        Ok(command.to_string())
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

/// Checks `name` against the kernel's interface naming rules.
fn validate_interface(name: &str) -> Result<String, ConfigError> {
    let reason = if name.is_empty() {
        Some("must not be empty")
    } else if name.len() > MAX_INTERFACE_LEN {
        Some("longer than 15 bytes")
    } else if name == "." || name == ".." {
        Some("reserved name")
    } else if name.chars().any(|c| c == '/' || c.is_whitespace()) {
        Some("contains '/' or whitespace")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ConfigError::InvalidInterface {
            name: name.to_string(),
            reason,
        }),
        None => Ok(name.to_string()),
    }
}

fn resolve_path(cli: Option<&PathBuf>, toml: Option<&PathBuf>, default: &str) -> PathBuf {
    cli.or(toml)
        .cloned()
        .unwrap_or_else(|| PathBuf::from(default))
}
