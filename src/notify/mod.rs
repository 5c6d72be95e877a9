//! Daemon notification.
//!
//! The regenerator never talks to radvd directly; it asks a [`Notifier`] to
//! either reload the configuration or restart decrementing lifetimes. Both
//! requests are fire-and-forget and quietly do nothing when the daemon is not
//! running.

#[cfg(unix)]
mod pid_file;

#[cfg(unix)]
pub use pid_file::PidFileNotifier;

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while notifying the daemon.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The pid file exists but could not be read.
    #[error("Failed to read pid file {}: {source}", path.display())]
    ReadPidFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The pid file does not hold a usable process id.
    #[error("Invalid pid '{content}' in {}", path.display())]
    InvalidPid { path: PathBuf, content: String },

    /// The signal could not be delivered.
    #[error("Failed to send {signal} to pid {pid}: {reason}")]
    Signal {
        signal: &'static str,
        pid: i32,
        reason: String,
    },

    /// Signalling is not available on this platform.
    #[error("Daemon notification is not supported on this platform")]
    Unsupported,
}

/// Reloads or resets the router advertisement daemon.
pub trait Notifier {
    /// Makes the daemon re-read its configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the daemon is running but cannot be reached.
    fn reload(&self) -> Result<(), NotifyError>;

    /// Makes the daemon restart its decrementing lifetime countdowns.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError`] if the daemon is running but cannot be reached.
    fn reset(&self) -> Result<(), NotifyError>;
}

/// Placeholder for platforms without POSIX signals.
#[cfg(not(unix))]
#[derive(Debug, Clone)]
pub struct PidFileNotifier {
    pid_file: PathBuf,
}

#[cfg(not(unix))]
impl PidFileNotifier {
    /// Creates a notifier for the daemon whose pid is stored in `pid_file`.
    #[must_use]
    pub fn new(pid_file: impl Into<PathBuf>) -> Self {
        Self {
            pid_file: pid_file.into(),
        }
    }

    /// Returns the pid file path.
    #[must_use]
    pub fn pid_file(&self) -> &std::path::Path {
        &self.pid_file
    }
}

#[cfg(not(unix))]
impl Notifier for PidFileNotifier {
    fn reload(&self) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }

    fn reset(&self) -> Result<(), NotifyError> {
        Err(NotifyError::Unsupported)
    }
}
