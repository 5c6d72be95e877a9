//! Live prefix discovery.
//!
//! This module provides:
//! - The [`AddressProbe`] trait consumed by the core
//! - [`ProbedPrefix`], one live /64 network with its lifetimes
//! - [`IpCommandProbe`], an implementation backed by iproute2 JSON output
//! - [`fold_into`], which records probe results in a [`Session`]

mod ip;

pub use ip::{IpCommandProbe, parse_ip_json};

use thiserror::Error;

use crate::session::{Lifetime, Session};

/// Error type for probe operations.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The probe command could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        /// Program that was executed
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The probe command exited unsuccessfully.
    #[error("'{program}' failed for interface {interface} ({status}): {stderr}")]
    CommandFailed {
        /// Program that was executed
        program: String,
        /// Interface being probed
        interface: String,
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The probe output could not be decoded.
    #[error("Failed to decode address list: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A globally scoped /64 network observed on an interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbedPrefix {
    /// Network in `<address>/<length>` form, e.g. `2001:db8:1::/64`.
    pub prefix: String,
    /// Remaining valid lifetime.
    pub valid: Lifetime,
    /// Remaining preferred lifetime.
    pub preferred: Lifetime,
}

impl ProbedPrefix {
    /// Creates a probed prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>, valid: Lifetime, preferred: Lifetime) -> Self {
        Self {
            prefix: prefix.into(),
            valid,
            preferred,
        }
    }
}

/// Source of live prefix facts for an interface.
///
/// # Contract
///
/// - Only globally scoped addresses with a /64 mask are returned
/// - Order follows what the underlying system reports
/// - An interface without such addresses yields an empty list, not an error
pub trait AddressProbe {
    /// Returns the live prefixes of `interface`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the system cannot be queried.
    fn probe(&self, interface: &str) -> Result<Vec<ProbedPrefix>, ProbeError>;
}

/// Records `probed` as live facts for `iface`.
///
/// A live prefix not declared in the template inherits the placeholder's
/// decrementing policy, so the owning interface is flagged decrementing.
pub fn fold_into(session: &mut Session, iface: &str, probed: &[ProbedPrefix]) {
    if probed.is_empty() {
        tracing::info!("No live prefixes on {iface}");
        return;
    }

    let dynamic_decrements = session
        .dynamic_facts(iface)
        .is_some_and(|facts| facts.decrement);

    for entry in probed {
        tracing::debug!(
            "Live prefix {} on {iface} (valid {}, preferred {})",
            entry.prefix,
            entry.valid,
            entry.preferred
        );
        session.record_live(iface, &entry.prefix, entry.valid, entry.preferred);

        if dynamic_decrements && !session.is_static(iface, &entry.prefix) {
            session.mark_decrementing(iface, &entry.prefix);
        }
    }
}
