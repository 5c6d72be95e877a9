//! Change causes and the resulting action.

use std::fmt;

use crate::session::{Field, Lifetime};

/// Why an interface needs attention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cause {
    /// Declared in the template but absent from the current file.
    InterfaceMissing,
    /// Present in the current file but no longer in the template.
    InterfaceRemoved,
    /// An expected prefix is absent from the current file.
    PrefixMissing(String),
    /// A published lifetime drifted beyond the threshold.
    LifetimeDrift {
        /// Affected prefix
        prefix: String,
        /// Affected field
        field: Field,
        /// Value that would be published now
        expected: Option<Lifetime>,
        /// Value found in the current file
        current: Option<Lifetime>,
        /// Both values are set and the prefix is statically declared with
        /// decrementing lifetimes
        countdown: bool,
    },
    /// The decrementing policy differs from the current file.
    DecrementChanged {
        /// Affected prefix
        prefix: String,
        /// Policy that would be published now
        expected: bool,
    },
    /// A prefix in the current file is neither declared nor live.
    Stale(String),
}

impl Cause {
    /// Returns true if restarting the countdown is enough to resolve this cause.
    #[must_use]
    pub const fn is_countdown_only(&self) -> bool {
        matches!(self, Self::LifetimeDrift { countdown: true, .. })
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InterfaceMissing => write!(f, "interface missing from current configuration"),
            Self::InterfaceRemoved => write!(f, "interface no longer in template"),
            Self::PrefixMissing(prefix) => write!(f, "{prefix} missing from current configuration"),
            Self::LifetimeDrift {
                prefix,
                field,
                expected,
                current,
                ..
            } => write!(
                f,
                "{prefix} {} {} -> {}",
                field.directive(),
                display_opt(*current),
                display_opt(*expected)
            ),
            Self::DecrementChanged { prefix, expected } => write!(
                f,
                "{prefix} DecrementLifetimes -> {}",
                if *expected { "on" } else { "off" }
            ),
            Self::Stale(prefix) => write!(f, "{prefix} is stale"),
        }
    }
}

fn display_opt(value: Option<Lifetime>) -> String {
    value.map_or_else(|| "unset".to_string(), |v| v.to_string())
}

/// All causes found for one interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceChange {
    /// Interface name.
    pub interface: String,
    /// Causes in discovery order; never empty.
    pub causes: Vec<Cause>,
    /// Whether any prefix on the interface decrements lifetimes.
    pub decrementing: bool,
}

/// Action required after comparing expected and current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing to do.
    Unchanged,
    /// Restart lifetime countdowns without reloading the file.
    Reset,
    /// Regenerate the file and reload the daemon.
    Reload,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unchanged => write!(f, "unchanged"),
            Self::Reset => write!(f, "reset"),
            Self::Reload => write!(f, "reload"),
        }
    }
}

/// Outcome of a differ run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    /// Changed interfaces, in interface order.
    pub changes: Vec<InterfaceChange>,
}

impl Report {
    /// Returns the action these changes call for.
    #[must_use]
    pub fn verdict(&self) -> Verdict {
        if self.changes.is_empty() {
            Verdict::Unchanged
        } else if self
            .changes
            .iter()
            .flat_map(|change| &change.causes)
            .all(Cause::is_countdown_only)
        {
            Verdict::Reset
        } else {
            Verdict::Reload
        }
    }

    /// Returns true if a reload should be followed by a countdown reset.
    #[must_use]
    pub fn reset_after_reload(&self) -> bool {
        self.changes.iter().any(|change| change.decrementing)
    }
}
