use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum InstallError {
    #[error("I/O Error: {0}")]
    Io(#[from] Arc<io::Error>),

    #[error("HTTP Request Error: {0}")]
    Http(#[from] Arc<reqwest::Error>),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Network Error: failed to fetch '{url}': {reason}")]
    Network { url: String, reason: String },

    #[error("Unexpected checksum format from '{url}': {reason}")]
    Format { url: String, reason: String },

    #[error(
        "Checksum mismatch for {} ({algorithm}): expected {expected}, got {actual}. \
         Re-run with --skip-checksum only if you trust the source.",
        .path.display()
    )]
    ChecksumMismatch {
        path: PathBuf,
        algorithm: String,
        expected: String,
        actual: String,
    },

    #[error(
        "Destination {} already exists. Use --force to overwrite or choose another directory.",
        .0.display()
    )]
    DestinationExists(PathBuf),

    #[error("Corrupt archive {}: {reason}", .path.display())]
    CorruptArchive { path: PathBuf, reason: String },

    #[error("Symlinks are not supported here ({}): {reason}", .link.display())]
    SymlinkUnsupported { link: PathBuf, reason: String },

    #[error("Permission denied for {}: {reason}", .path.display())]
    Permission { path: PathBuf, reason: String },

    #[error("Installation aborted by user")]
    Interrupted,
}

impl InstallError {
    /// Wraps an I/O failure on `path`, keeping permission problems distinct.
    pub fn fs(path: &Path, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            return InstallError::Permission {
                path: path.to_path_buf(),
                reason: err.to_string(),
            };
        }
        InstallError::Io(Arc::new(io::Error::new(
            err.kind(),
            format!("{}: {}", path.display(), err),
        )))
    }

    pub fn network(url: &str, reason: impl Into<String>) -> Self {
        InstallError::Network {
            url: url.to_string(),
            reason: reason.into(),
        }
    }

    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        InstallError::CorruptArchive {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for InstallError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::PermissionDenied {
            return InstallError::Permission {
                path: PathBuf::new(),
                reason: err.to_string(),
            };
        }
        InstallError::Io(Arc::new(err))
    }
}

impl From<reqwest::Error> for InstallError {
    fn from(err: reqwest::Error) -> Self {
        InstallError::Http(Arc::new(err))
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_maps_to_permission_variant() {
        let err = InstallError::fs(
            Path::new("/opt/tools"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, InstallError::Permission { ref path, .. } if path == Path::new("/opt/tools")));
    }

    #[test]
    fn other_io_errors_keep_path_context() {
        let err = InstallError::fs(
            Path::new("/tmp/x"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x"));
        assert!(msg.contains("gone"));
    }

    #[test]
    fn destination_exists_message_mentions_force() {
        let err = InstallError::DestinationExists(PathBuf::from("/home/u/opt/apache-maven-3.9.11"));
        let msg = err.to_string();
        assert!(msg.contains("apache-maven-3.9.11"));
        assert!(msg.contains("--force"));
    }
}
