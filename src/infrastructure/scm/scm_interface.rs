use std::path::Path;
use std::sync::Arc;

use indicatif::ProgressBar;

use crate::domain::value_objects::{commit::CommitInfo, file_status::WorktreeStatus, git_url::GitUrl};
use crate::infrastructure::git::GitRepositoryError;

/// Common interface for the source control operations the workspace commands need.
///
/// Calls block; callers fanning out across repositories run them on blocking threads.
#[cfg_attr(test, mockall::automock)]
pub trait ScmOperations: Send + Sync {
    /// Clone a repository from the given URL to the specified path
    fn clone_repository(
        &self,
        url: &GitUrl,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> Result<(), ScmError>;

    /// Commits reachable from HEAD, newest first
    fn commit_log(&self, repo_path: &Path, max_count: Option<usize>)
        -> Result<Vec<CommitInfo>, ScmError>;

    /// Get the working tree status of a repository
    fn status(&self, repo_path: &Path) -> Result<WorktreeStatus, ScmError>;

    /// Stage a path relative to the repository root
    fn stage(&self, repo_path: &Path, file: &Path) -> Result<(), ScmError>;
}

/// Shared handle used by the fan-out workers
pub type SharedScm = Arc<dyn ScmOperations>;

/// Options for cloning repositories
#[derive(Debug, Clone, Default)]
pub struct CloneOptions {
    /// Bar that receives transfer progress, if any
    pub progress: Option<ProgressBar>,
}

/// Errors that can occur during SCM operations
#[derive(Debug, thiserror::Error)]
pub enum ScmError {
    #[error("Repository not found at path: {path}")]
    RepositoryNotFound { path: String },

    #[error("{path} already exists")]
    AlreadyExists { path: String },

    #[error("{message}")]
    CloneFailed { message: String },

    #[error("{message}")]
    LogFailed { message: String },

    #[error("{message}")]
    StatusFailed { message: String },

    #[error("{message}")]
    StageFailed { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ScmError {
    /// Create a clone failed error
    pub fn clone_failed(message: impl Into<String>) -> Self {
        Self::CloneFailed {
            message: message.into(),
        }
    }

    /// Create a log failed error
    pub fn log_failed(message: impl Into<String>) -> Self {
        Self::LogFailed {
            message: message.into(),
        }
    }

    /// Create a status failed error
    pub fn status_failed(message: impl Into<String>) -> Self {
        Self::StatusFailed {
            message: message.into(),
        }
    }

    /// Create a stage failed error
    pub fn stage_failed(message: impl Into<String>) -> Self {
        Self::StageFailed {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the destination was left untouched because it already existed
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }
}

impl From<GitRepositoryError> for ScmError {
    fn from(err: GitRepositoryError) -> Self {
        match err {
            GitRepositoryError::RepositoryNotFound(path) => Self::RepositoryNotFound { path },
            GitRepositoryError::AlreadyExists(path) => Self::AlreadyExists { path },
            GitRepositoryError::IoError(source) => Self::IoError { source },
            e @ GitRepositoryError::CloneFailed { .. } => Self::clone_failed(e.to_string()),
            e @ (GitRepositoryError::HeadNotFound(_) | GitRepositoryError::LogFailed(_)) => {
                Self::log_failed(e.to_string())
            }
            e @ GitRepositoryError::StageFailed { .. } => Self::stage_failed(e.to_string()),
            e @ (GitRepositoryError::OpenFailed(_) | GitRepositoryError::StatusFailed(_)) => {
                Self::status_failed(e.to_string())
            }
            e @ GitRepositoryError::Git2Error(_) => Self::internal(e.to_string()),
        }
    }
}
