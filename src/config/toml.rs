//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// File locations
    #[serde(default)]
    pub paths: PathsSection,

    /// Change detection settings
    #[serde(default)]
    pub diff: DiffSection,

    /// Dispatcher event filtering
    #[serde(default)]
    pub trigger: TriggerSection,

    /// Address probe settings
    #[serde(default)]
    pub probe: ProbeSection,
}

/// File locations section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsSection {
    /// radvd template
    pub template: Option<PathBuf>,

    /// Generated radvd configuration
    pub output: Option<PathBuf>,

    /// radvd pid file
    pub pid_file: Option<PathBuf>,
}

/// Change detection section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiffSection {
    /// Significance threshold in percent
    pub threshold: Option<u32>,
}

/// Dispatcher event section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TriggerSection {
    /// Event kinds that trigger a run
    pub events: Option<Vec<String>>,
}

/// Address probe section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeSection {
    /// iproute2 program
    pub ip_command: Option<String>,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# radvd-regen configuration file
#
# Every setting can also be given on the command line, which takes precedence.

[paths]
# radvd template containing the @PREFIX@ placeholder
# template = "/etc/radvd.conf.tpl"

# Generated configuration read by radvd
# output = "/etc/radvd.conf"

# radvd pid file, used to send SIGHUP (reload) and SIGUSR1 (reset)
# pid_file = "/run/radvd.pid"

[diff]
# Relative lifetime difference in percent that counts as a change (default: 10)
threshold = 10

[trigger]
# Dispatcher events that trigger a run; others exit immediately
events = ["up", "dhcp6-change", "reapply"]

[probe]
# iproute2 program used to read interface addresses
# ip_command = "ip"
"#
    .to_string()
}
