use super::scm_interface::{CloneOptions, ScmError, ScmOperations};
use crate::domain::value_objects::{commit::CommitInfo, file_status::WorktreeStatus, git_url::GitUrl};
use crate::infrastructure::git::{CloneConfig, GitRepository};
use std::path::Path;
use tracing::debug;

/// Git implementation of SCM operations, backed by libgit2
#[derive(Debug, Default, Clone, Copy)]
pub struct GitScm;

impl GitScm {
    /// Create a new Git SCM instance
    pub fn new() -> Self {
        Self
    }
}

impl ScmOperations for GitScm {
    fn clone_repository(
        &self,
        url: &GitUrl,
        dest_path: &Path,
        options: &CloneOptions,
    ) -> Result<(), ScmError> {
        let config = CloneConfig {
            progress: options.progress.clone(),
            ..CloneConfig::for_url(url)
        };
        debug!("Clone auth for {}: {:?}", url, config.auth);

        GitRepository::clone(url, dest_path, &config)?;
        Ok(())
    }

    fn commit_log(
        &self,
        repo_path: &Path,
        max_count: Option<usize>,
    ) -> Result<Vec<CommitInfo>, ScmError> {
        let repo = GitRepository::open(repo_path)?;
        Ok(repo.commit_log(max_count)?)
    }

    fn status(&self, repo_path: &Path) -> Result<WorktreeStatus, ScmError> {
        let repo = GitRepository::open(repo_path)?;
        Ok(repo.status()?)
    }

    fn stage(&self, repo_path: &Path, file: &Path) -> Result<(), ScmError> {
        let repo = GitRepository::open(repo_path)?;
        repo.stage(file)?;
        Ok(())
    }
}
