//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

/// Default radvd template path.
pub const TEMPLATE: &str = "/etc/radvd.conf.tpl";

/// Default generated configuration path.
pub const OUTPUT: &str = "/etc/radvd.conf";

/// Default radvd pid file.
pub const PID_FILE: &str = "/run/radvd.pid";

/// Default significance threshold in percent.
pub const THRESHOLD: u32 = crate::diff::DEFAULT_THRESHOLD;

/// Dispatcher events that trigger a run by default.
pub const EVENTS: &[&str] = &["up", "dhcp6-change", "reapply"];

/// Default iproute2 program.
pub const IP_COMMAND: &str = "ip";

/// Default output path of the `init` subcommand.
pub const CONFIG_FILE: &str = "radvd-regen.toml";

/// Default trigger events as owned strings.
#[must_use]
pub fn events() -> Vec<String> {
    EVENTS.iter().map(ToString::to_string).collect()
}
