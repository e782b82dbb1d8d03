use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// One member repository's failure inside a fanned-out operation.
#[derive(Debug)]
pub struct RepositoryFailure {
    /// Short name of the repository that failed
    pub repository: String,
    /// The error it failed with
    pub error: BmoError,
}

impl fmt::Display for RepositoryFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            // already rendered with its repository prefix
            BmoError::GitError {
                repository: Some(repository),
                ..
            } if *repository == self.repository => write!(f, "{}", self.error),
            _ => write!(f, "[{}] {}", self.repository, self.error),
        }
    }
}

#[derive(Error, Debug)]
pub enum BmoError {
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{workspace} does not exist{}", hint_suffix(.known))]
    WorkspaceNotFound {
        workspace: String,
        known: Vec<String>,
    },

    #[error("{repository} not a part of workspace {workspace}")]
    UnknownRepository {
        repository: String,
        workspace: String,
    },

    #[error("{} is already a member of workspace {workspace}", .path.display())]
    DuplicateMember { path: PathBuf, workspace: String },

    #[error("{url} already exists in {workspace} workspace at {}", .path.display())]
    AlreadyMember {
        url: String,
        path: PathBuf,
        workspace: String,
    },

    #[error(
        "{} would share the name {name:?} with {} in workspace {workspace}",
        .path.display(),
        .existing.display()
    )]
    AmbiguousRepository {
        name: String,
        path: PathBuf,
        existing: PathBuf,
        workspace: String,
    },

    #[error("{}{message}", repo_prefix(.repository))]
    GitError {
        message: String,
        repository: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Validation error: {field} - {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("{} of {total} repositories failed:\n{}", .failures.len(), join_failures(.failures))]
    RepositoriesFailed {
        total: usize,
        failures: Vec<RepositoryFailure>,
    },

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

fn hint_suffix(known: &[String]) -> String {
    if known.is_empty() {
        String::new()
    } else {
        format!(" (known workspaces: {})", known.join(", "))
    }
}

fn repo_prefix(repository: &Option<String>) -> String {
    match repository {
        Some(repository) => format!("[{}] ", repository),
        None => String::new(),
    }
}

fn join_failures(failures: &[RepositoryFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("  {}", f))
        .collect::<Vec<_>>()
        .join("\n")
}

impl BmoError {
    pub fn config_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            path,
            source: Some(Box::new(source)),
        }
    }

    pub fn workspace_not_found(workspace: impl Into<String>, known: Vec<String>) -> Self {
        Self::WorkspaceNotFound {
            workspace: workspace.into(),
            known,
        }
    }

    pub fn unknown_repository(repository: impl Into<String>, workspace: impl Into<String>) -> Self {
        Self::UnknownRepository {
            repository: repository.into(),
            workspace: workspace.into(),
        }
    }

    pub fn git_error(message: impl Into<String>, repository: Option<String>) -> Self {
        Self::GitError {
            message: message.into(),
            repository,
            source: None,
        }
    }

    pub fn git_error_with_source(
        message: impl Into<String>,
        repository: Option<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::GitError {
            message: message.into(),
            repository,
            source: Some(Box::new(source)),
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
            source: None,
        }
    }

    pub fn internal_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::InternalError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Repository the error is attributed to, if any
    pub fn repository(&self) -> Option<&str> {
        match self {
            Self::GitError { repository, .. } => repository.as_deref(),
            Self::UnknownRepository { repository, .. } => Some(repository),
            _ => None,
        }
    }
}

impl From<git2::Error> for BmoError {
    fn from(error: git2::Error) -> Self {
        Self::git_error_with_source(error.message().to_string(), None, error)
    }
}

impl From<std::io::Error> for BmoError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_json::Error> for BmoError {
    fn from(error: serde_json::Error) -> Self {
        Self::internal_error_with_source("JSON serialization failed", error)
    }
}
