//! Atomic replacement of the generated configuration.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors while writing the generated configuration.
#[derive(Debug, Error)]
pub enum OutputError {
    /// The destination directory could not be created.
    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scratch file could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scratch file could not be moved over the destination.
    #[error("Failed to replace {}: {source}", path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Returns the scratch path used while writing `dest`.
///
/// Appends `.tmp` instead of replacing the extension, so `radvd.conf`
/// becomes `radvd.conf.tmp`.
#[must_use]
pub fn scratch_path(dest: &Path) -> PathBuf {
    PathBuf::from(format!("{}.tmp", dest.display()))
}

/// Writes `content` to `dest` so readers never see a partial file.
///
/// The content goes to a scratch file next to `dest` first, which is then
/// renamed over it. An existing destination keeps its permissions.
///
/// # Errors
///
/// Returns [`OutputError`] if any step fails. The destination is left
/// untouched in that case and the scratch file is removed on a best-effort
/// basis.
pub fn write_atomically(dest: &Path, content: &str) -> Result<(), OutputError> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let temp_path = scratch_path(dest);
    std::fs::write(&temp_path, content).map_err(|source| OutputError::Write {
        path: temp_path.clone(),
        source,
    })?;

    if let Ok(metadata) = std::fs::metadata(dest) {
        if let Err(e) = std::fs::set_permissions(&temp_path, metadata.permissions()) {
            tracing::debug!("Could not copy permissions of {}: {e}", dest.display());
        }
    }

    if let Err(source) = std::fs::rename(&temp_path, dest) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(OutputError::Replace {
            path: dest.to_path_buf(),
            source,
        });
    }

    tracing::debug!("Wrote {} ({} bytes)", dest.display(), content.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn scratch_path_appends_suffix() {
        assert_eq!(
            scratch_path(Path::new("/etc/radvd.conf")),
            PathBuf::from("/etc/radvd.conf.tmp")
        );
    }

    #[test]
    fn replaces_existing_file() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("radvd.conf");
        std::fs::write(&dest, "old\n").unwrap();

        write_atomically(&dest, "new\n").unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new\n");
        assert!(!scratch_path(&dest).exists());
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("nested").join("radvd.conf");

        write_atomically(&dest, "interface lan1 {\n};\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "interface lan1 {\n};\n"
        );
    }

    #[test]
    fn failed_rename_leaves_destination_alone() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file.
        let dest = dir.path().join("radvd.conf");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep"), "x").unwrap();

        let err = write_atomically(&dest, "new\n").unwrap_err();

        assert!(matches!(err, OutputError::Replace { .. }));
        assert!(dest.join("keep").exists());
        assert!(!scratch_path(&dest).exists());
    }

    #[cfg(unix)]
    #[test]
    fn keeps_destination_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("radvd.conf");
        std::fs::write(&dest, "old\n").unwrap();
        std::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_atomically(&dest, "new\n").unwrap();

        let mode = std::fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o640);
    }
}
