use thiserror::Error;

use crate::config::{FATAL_EXIT, VERSION_CONFLICT_EXIT};

/// Unified error type for gorelease operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("Repository not found: {0}")]
    RepoNotFound(String),

    #[error("{operation}: {source}")]
    RepoIo {
        operation: String,
        #[source]
        source: git2::Error,
    },

    #[error("Release precondition failed: {0}")]
    Precondition(String),

    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    #[error("Version conflict: {0}")]
    VersionConflict(String),

    #[error("Tag error: {0}")]
    TagCreate(String),

    #[error("Push to '{remote}' failed: {message}")]
    Push { remote: String, message: String },

    #[error("{operation}: {source}")]
    FsIo {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<git2::Error> for ReleaseError {
    fn from(source: git2::Error) -> Self {
        ReleaseError::RepoIo {
            operation: "git operation failed".to_string(),
            source,
        }
    }
}

impl From<std::io::Error> for ReleaseError {
    fn from(source: std::io::Error) -> Self {
        ReleaseError::FsIo {
            operation: "I/O error".to_string(),
            source,
        }
    }
}

/// Convenience type alias for Results in gorelease
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Wrap a git error with the operation that was being attempted
    pub fn repo_io(operation: impl Into<String>, source: git2::Error) -> Self {
        ReleaseError::RepoIo {
            operation: operation.into(),
            source,
        }
    }

    /// Wrap an I/O error with the operation that was being attempted
    pub fn fs_io(operation: impl Into<String>, source: std::io::Error) -> Self {
        ReleaseError::FsIo {
            operation: operation.into(),
            source,
        }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        ReleaseError::Precondition(msg.into())
    }

    pub fn invalid_version(version: impl Into<String>, reason: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion {
            version: version.into(),
            reason: reason.into(),
        }
    }

    pub fn version_conflict(msg: impl Into<String>) -> Self {
        ReleaseError::VersionConflict(msg.into())
    }

    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::TagCreate(msg.into())
    }

    pub fn push(remote: impl Into<String>, message: impl Into<String>) -> Self {
        ReleaseError::Push {
            remote: remote.into(),
            message: message.into(),
        }
    }

    /// Process exit code the shell reports for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            ReleaseError::VersionConflict(_) => VERSION_CONFLICT_EXIT,
            _ => FATAL_EXIT,
        }
    }
}
