//! Signal delivery through the daemon's pid file.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;

use super::{NotifyError, Notifier};

/// Signals the daemon whose pid is stored in a file.
///
/// `SIGHUP` reloads the configuration, `SIGUSR1` resets decrementing
/// lifetimes. A missing pid file or a pid with no process behind it means the
/// daemon is not running, which is not an error.
#[derive(Debug, Clone)]
pub struct PidFileNotifier {
    pid_file: PathBuf,
}

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
    pub fn pid_file(&self) -> &Path {
        &self.pid_file
    }

    /// Reads the daemon pid, `None` if the pid file does not exist.
    fn read_pid(&self) -> Result<Option<Pid>, NotifyError> {
        let content = match std::fs::read_to_string(&self.pid_file) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(NotifyError::ReadPidFile {
                    path: self.pid_file.clone(),
                    source,
                });
            }
        };

        match content.trim().parse::<i32>() {
            Ok(pid) if pid > 0 => Ok(Some(Pid::from_raw(pid))),
            _ => Err(NotifyError::InvalidPid {
                path: self.pid_file.clone(),
                content: content.trim().to_string(),
            }),
        }
    }

    fn send(&self, signal: Signal) -> Result<(), NotifyError> {
        let Some(pid) = self.read_pid()? else {
            tracing::debug!(
                "No pid file at {}, daemon not running",
                self.pid_file.display()
            );
            return Ok(());
        };

        match kill(pid, signal) {
            Ok(()) => {
                tracing::info!("Sent {} to radvd (pid {pid})", signal.as_str());
                Ok(())
            }
            Err(Errno::ESRCH) => {
                tracing::debug!("No process with pid {pid}, daemon not running");
                Ok(())
            }
            Err(e) => Err(NotifyError::Signal {
                signal: signal.as_str(),
                pid: pid.as_raw(),
                reason: e.desc().to_string(),
            }),
        }
    }
}

impl Notifier for PidFileNotifier {
    fn reload(&self) -> Result<(), NotifyError> {
        self.send(Signal::SIGHUP)
    }

    fn reset(&self) -> Result<(), NotifyError> {
        self.send(Signal::SIGUSR1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_pid_file_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let notifier = PidFileNotifier::new(dir.path().join("radvd.pid"));

        assert!(notifier.reload().is_ok());
        assert!(notifier.reset().is_ok());
    }

    #[test]
    fn garbage_pid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radvd.pid");
        std::fs::write(&path, "not-a-pid\n").unwrap();

        let err = PidFileNotifier::new(&path).reload().unwrap_err();
        assert!(matches!(err, NotifyError::InvalidPid { ref content, .. } if content == "not-a-pid"));
    }

    #[test]
    fn non_positive_pid_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radvd.pid");
        std::fs::write(&path, "0").unwrap();

        assert!(matches!(
            PidFileNotifier::new(&path).reset(),
            Err(NotifyError::InvalidPid { .. })
        ));
    }

    #[test]
    fn exited_process_is_a_no_op() {
        let mut child = std::process::Command::new("true").spawn().unwrap();
        let pid = child.id();
        child.wait().unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radvd.pid");
        std::fs::write(&path, format!("{pid}\n")).unwrap();

        assert!(PidFileNotifier::new(&path).reload().is_ok());
    }

    #[test]
    fn reads_pid_with_surrounding_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("radvd.pid");
        std::fs::write(&path, "  4242 \n").unwrap();

        let pid = PidFileNotifier::new(&path).read_pid().unwrap();
        assert_eq!(pid, Some(Pid::from_raw(4242)));
    }
}
