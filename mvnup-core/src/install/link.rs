// mvnup-core/src/install/link.rs
use std::fs;
use std::io;
use std::path::Path;

use mvnup_common::error::{InstallError, Result};
use mvnup_common::platform::Platform;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Created,
    /// The link already pointed at the target.
    Unchanged,
}

/// Points `link_path` at `target`, replacing whatever occupies it.
pub fn link(target: &Path, link_path: &Path, platform: &Platform) -> Result<LinkOutcome> {
    if let Ok(existing) = fs::read_link(link_path) {
        if existing == target {
            debug!(
                "Symlink {} already points to {}",
                link_path.display(),
                target.display()
            );
            return Ok(LinkOutcome::Unchanged);
        }
    }

    if let Some(parent) = link_path.parent() {
        fs::create_dir_all(parent).map_err(|e| InstallError::fs(parent, e))?;
    }
    remove_existing_link_target(link_path)?;

    debug!(
        "Creating symlink {} -> {}",
        link_path.display(),
        target.display()
    );
    match create_dir_symlink(target, link_path) {
        Ok(()) => Ok(LinkOutcome::Created),
        Err(e) if !platform.supports_unprivileged_symlinks() => {
            Err(InstallError::SymlinkUnsupported {
                link: link_path.to_path_buf(),
                reason: format!(
                    "{e}. Run from an elevated prompt or pass --no-symlink / --no-java-symlink"
                ),
            })
        }
        Err(e) => Err(InstallError::fs(link_path, e)),
    }
}

#[cfg(unix)]
fn create_dir_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link_path)
}

#[cfg(windows)]
fn create_dir_symlink(target: &Path, link_path: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_dir(target, link_path)
}

#[cfg(not(any(unix, windows)))]
fn create_dir_symlink(_target: &Path, _link_path: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not available on this platform",
    ))
}

/// Removes a file, symlink or real directory at `path`, if any.
pub(crate) fn remove_existing_link_target(path: &Path) -> Result<()> {
    match path.symlink_metadata() {
        Ok(metadata) => {
            debug!("Removing existing item at {}", path.display());
            let file_type = metadata.file_type();
            let remove_result = if file_type.is_dir() && !file_type.is_symlink() {
                fs::remove_dir_all(path)
            } else {
                fs::remove_file(path)
            };
            remove_result.map_err(|e| InstallError::fs(path, e))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(InstallError::fs(path, e)),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn linux() -> Platform {
        Platform::from_consts("linux", "x86_64")
    }

    #[test]
    fn creates_link_and_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("apache-maven-3.9.11");
        fs::create_dir_all(&target).unwrap();
        let link_path = dir.path().join("nested/opt/apache-maven");

        assert_eq!(link(&target, &link_path, &linux()).unwrap(), LinkOutcome::Created);
        assert_eq!(fs::read_link(&link_path).unwrap(), target);
    }

    #[test]
    fn repointing_replaces_old_link() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("old");
        let new = dir.path().join("new");
        fs::create_dir_all(&old).unwrap();
        fs::create_dir_all(&new).unwrap();
        let link_path = dir.path().join("current");

        link(&old, &link_path, &linux()).unwrap();
        link(&new, &link_path, &linux()).unwrap();
        assert_eq!(fs::read_link(&link_path).unwrap(), new);
        assert!(old.is_dir());
    }

    #[test]
    fn same_target_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("t");
        fs::create_dir_all(&target).unwrap();
        let link_path = dir.path().join("l");

        link(&target, &link_path, &linux()).unwrap();
        assert_eq!(link(&target, &link_path, &linux()).unwrap(), LinkOutcome::Unchanged);
    }

    #[test]
    fn replaces_regular_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("t");
        fs::create_dir_all(&target).unwrap();

        let file_link = dir.path().join("was-file");
        fs::write(&file_link, b"x").unwrap();
        link(&target, &file_link, &linux()).unwrap();
        assert_eq!(fs::read_link(&file_link).unwrap(), target);

        let dir_link = dir.path().join("was-dir");
        fs::create_dir_all(dir_link.join("inner")).unwrap();
        link(&target, &dir_link, &linux()).unwrap();
        assert_eq!(fs::read_link(&dir_link).unwrap(), target);
    }
}
