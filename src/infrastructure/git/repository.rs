use std::path::{Path, PathBuf};

use git2::{
    build::RepoBuilder, ErrorCode, FetchOptions, RemoteCallbacks, Repository as Git2Repository,
    Sort, Status, StatusOptions,
};
use indicatif::ProgressBar;
use thiserror::Error;
use tracing::debug;

use crate::domain::value_objects::{
    commit::{CommitInfo, Signature},
    file_status::{StatusCode, StatusEntry, WorktreeStatus},
    git_url::GitUrl,
};
use crate::infrastructure::git::credentials::AuthStrategy;

/// Git repository operations related errors
#[derive(Debug, Error)]
pub enum GitRepositoryError {
    #[error("repository not found at path: {0}")]
    RepositoryNotFound(String),

    #[error("unable to open repo: {0}")]
    OpenFailed(String),

    #[error("unable to get ref HEAD: {0}")]
    HeadNotFound(String),

    #[error("unable to get commit iter: {0}")]
    LogFailed(String),

    #[error("unable to get repository worktree status: {0}")]
    StatusFailed(String),

    #[error("unable to stage {file:?}: {message}")]
    StageFailed { file: String, message: String },

    #[error("{0} is already a repository or a non-empty directory")]
    AlreadyExists(String),

    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    #[error("Git2 error: {0}")]
    Git2Error(#[from] git2::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Clone options for repository cloning
#[derive(Debug, Clone)]
pub struct CloneConfig {
    /// Credentials strategy for the remote
    pub auth: AuthStrategy,

    /// Bar that receives object transfer progress
    pub progress: Option<ProgressBar>,
}

impl CloneConfig {
    pub fn for_url(url: &GitUrl) -> Self {
        Self {
            auth: AuthStrategy::for_url(url),
            progress: None,
        }
    }
}

/// Wrapper around git2::Repository with high-level operations
pub struct GitRepository {
    /// The underlying git2 repository
    repo: Git2Repository,

    /// Repository path
    path: PathBuf,
}

impl std::fmt::Debug for GitRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitRepository")
            .field("path", &self.path)
            .field("repo", &"<git2::Repository>")
            .finish()
    }
}

impl GitRepository {
    /// Open an existing Git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, GitRepositoryError> {
        let path_buf = path.as_ref().to_path_buf();

        if !path_buf.exists() {
            return Err(GitRepositoryError::RepositoryNotFound(
                path_buf.display().to_string(),
            ));
        }

        let repo = Git2Repository::open(&path_buf)
            .map_err(|e| GitRepositoryError::OpenFailed(e.message().to_string()))?;

        Ok(Self {
            repo,
            path: path_buf,
        })
    }

    /// Initialize a new Git repository
    pub fn init<P: AsRef<Path>>(path: P) -> Result<Self, GitRepositoryError> {
        let path_buf = path.as_ref().to_path_buf();

        if !path_buf.exists() {
            std::fs::create_dir_all(&path_buf)?;
        }

        let repo = Git2Repository::init(&path_buf)?;

        Ok(Self {
            repo,
            path: path_buf,
        })
    }

    /// Whether `path` already opens as a Git repository
    pub fn is_repository<P: AsRef<Path>>(path: P) -> bool {
        Git2Repository::open(path.as_ref()).is_ok()
    }

    /// Clone `url` into `target_path`.
    ///
    /// A destination that already holds a repository, or any non-empty
    /// directory, is rejected before anything is written. On any other
    /// failure the partially written destination is removed.
    pub fn clone(
        url: &GitUrl,
        target_path: &Path,
        config: &CloneConfig,
    ) -> Result<Self, GitRepositoryError> {
        if Self::is_repository(target_path) || is_non_empty_dir(target_path) {
            return Err(GitRepositoryError::AlreadyExists(
                target_path.display().to_string(),
            ));
        }

        // an empty destination made by the user survives a failed clone
        let existed = target_path.exists();

        if let Some(parent) = target_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut callbacks = RemoteCallbacks::new();
        config.auth.install(&mut callbacks);

        if let Some(bar) = &config.progress {
            callbacks.transfer_progress(move |stats| {
                bar.set_length(stats.total_objects() as u64);
                bar.set_position(stats.received_objects() as u64);
                true
            });
        }

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);

        debug!("Cloning {} into {}", url, target_path.display());
        let result = builder.clone(url.as_str(), target_path);

        if let Some(bar) = &config.progress {
            bar.finish_and_clear();
        }

        match result {
            Ok(repo) => Ok(Self {
                repo,
                path: target_path.to_path_buf(),
            }),
            Err(e) if e.code() == ErrorCode::Exists => Err(GitRepositoryError::AlreadyExists(
                target_path.display().to_string(),
            )),
            Err(e) => {
                if target_path.exists() {
                    debug!("Removing partial clone at {}", target_path.display());
                    if let Err(cleanup) = remove_partial_clone(target_path, existed) {
                        debug!(
                            "Failed to remove {}: {}",
                            target_path.display(),
                            cleanup
                        );
                    }
                }
                Err(GitRepositoryError::CloneFailed {
                    url: url.to_string(),
                    message: e.message().to_string(),
                })
            }
        }
    }

    /// Commits reachable from HEAD, newest committer time first
    pub fn commit_log(&self, max_count: Option<usize>) -> Result<Vec<CommitInfo>, GitRepositoryError> {
        let head = self
            .repo
            .head()
            .map_err(|e| GitRepositoryError::HeadNotFound(e.message().to_string()))?;
        let head_oid = head
            .target()
            .ok_or_else(|| GitRepositoryError::HeadNotFound("HEAD is not a direct reference".into()))?;

        let log_err = |e: git2::Error| GitRepositoryError::LogFailed(e.message().to_string());

        let mut revwalk = self.repo.revwalk().map_err(log_err)?;
        revwalk.set_sorting(Sort::TIME).map_err(log_err)?;
        revwalk.push(head_oid).map_err(log_err)?;

        let mut commits = Vec::new();
        for oid in revwalk {
            if max_count.is_some_and(|max| commits.len() >= max) {
                break;
            }
            let commit = self.repo.find_commit(oid.map_err(log_err)?).map_err(log_err)?;
            let author = commit.author();
            commits.push(CommitInfo {
                id: commit.id().to_string(),
                author: Signature {
                    name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
                    email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
                    seconds: author.when().seconds(),
                    offset_minutes: author.when().offset_minutes(),
                },
                message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
            });
        }

        Ok(commits)
    }

    /// Staged, unstaged and untracked changes in the working tree
    pub fn status(&self) -> Result<WorktreeStatus, GitRepositoryError> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .renames_head_to_index(true);

        let statuses = self
            .repo
            .statuses(Some(&mut options))
            .map_err(|e| GitRepositoryError::StatusFailed(e.message().to_string()))?;

        let entries = statuses
            .iter()
            .filter_map(|entry| {
                let filename = entry
                    .head_to_index()
                    .and_then(|delta| delta.new_file().path())
                    .or_else(|| entry.index_to_workdir().and_then(|d| d.new_file().path()))
                    .map(|p| p.to_string_lossy().into_owned())
                    .or_else(|| entry.path().map(str::to_string))?;
                status_entry(filename, entry.status())
            })
            .collect();

        Ok(WorktreeStatus::new(entries))
    }

    /// Stage one path, relative to the working tree root.
    ///
    /// A path that is gone from disk is staged as a deletion.
    pub fn stage(&self, file: &Path) -> Result<(), GitRepositoryError> {
        let stage_err = |e: git2::Error| GitRepositoryError::StageFailed {
            file: file.display().to_string(),
            message: e.message().to_string(),
        };

        let workdir = self.repo.workdir().ok_or_else(|| GitRepositoryError::StageFailed {
            file: file.display().to_string(),
            message: "repository has no working tree".to_string(),
        })?;

        let mut index = self.repo.index().map_err(stage_err)?;
        if workdir.join(file).exists() {
            index.add_path(file).map_err(stage_err)?;
        } else if index.get_path(file, 0).is_some() {
            index.remove_path(file).map_err(stage_err)?;
        } else {
            return Err(GitRepositoryError::StageFailed {
                file: file.display().to_string(),
                message: "pathspec did not match any files".to_string(),
            });
        }
        index.write().map_err(stage_err)?;

        Ok(())
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the underlying git2 repository
    pub fn git2_repo(&self) -> &Git2Repository {
        &self.repo
    }
}

fn remove_partial_clone(path: &Path, keep_root: bool) -> std::io::Result<()> {
    if !keep_root {
        return std::fs::remove_dir_all(path);
    }
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            std::fs::remove_dir_all(entry.path())?;
        } else {
            std::fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

fn is_non_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}

/// Map libgit2 status flags onto a staging/worktree code pair.
///
/// Returns `None` for entries with nothing to report (ignored or current).
fn status_entry(filename: String, status: Status) -> Option<StatusEntry> {
    if status.contains(Status::WT_NEW) {
        return Some(StatusEntry::untracked(filename));
    }

    let staging = if status.contains(Status::INDEX_NEW) {
        StatusCode::Added
    } else if status.intersects(Status::INDEX_MODIFIED | Status::INDEX_TYPECHANGE) {
        StatusCode::Modified
    } else if status.contains(Status::INDEX_DELETED) {
        StatusCode::Deleted
    } else if status.contains(Status::INDEX_RENAMED) {
        StatusCode::Renamed
    } else {
        StatusCode::Unmodified
    };

    let worktree = if status.intersects(
        Status::WT_MODIFIED | Status::WT_TYPECHANGE | Status::CONFLICTED,
    ) {
        StatusCode::Modified
    } else if status.contains(Status::WT_DELETED) {
        StatusCode::Deleted
    } else if status.contains(Status::WT_RENAMED) {
        StatusCode::Renamed
    } else {
        StatusCode::Unmodified
    };

    if staging == StatusCode::Unmodified && worktree == StatusCode::Unmodified {
        return None;
    }

    Some(StatusEntry::new(filename, staging, worktree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn commit_all(repo: &GitRepository, message: &str) {
        let git = repo.git2_repo();
        let mut index = git.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = git.find_tree(tree_id).unwrap();
        let sig = git2::Signature::now("Test User", "test@example.com").unwrap();
        let parents: Vec<_> = git
            .head()
            .ok()
            .and_then(|h| h.target())
            .map(|oid| git.find_commit(oid).unwrap())
            .into_iter()
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        git.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .unwrap();
    }

    #[test]
    fn test_repository_init() {
        let temp_dir = TempDir::new().unwrap();
        let repo_path = temp_dir.path().join("test_repo");

        let repo = GitRepository::init(&repo_path).unwrap();
        assert_eq!(repo.path(), repo_path);
        assert!(GitRepository::is_repository(&repo_path));
    }

    #[test]
    fn test_repository_open_nonexistent() {
        let temp_dir = TempDir::new().unwrap();
        let nonexistent_path = temp_dir.path().join("nonexistent");

        let result = GitRepository::open(&nonexistent_path);
        assert!(matches!(
            result.unwrap_err(),
            GitRepositoryError::RepositoryNotFound(_)
        ));
    }

    #[test]
    fn test_open_plain_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = GitRepository::open(temp_dir.path());
        assert!(matches!(result.unwrap_err(), GitRepositoryError::OpenFailed(_)));
    }

    #[test]
    fn test_commit_log_without_commits() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GitRepository::init(temp_dir.path()).unwrap();

        let err = repo.commit_log(None).unwrap_err();
        assert!(matches!(err, GitRepositoryError::HeadNotFound(_)));
        assert!(err.to_string().starts_with("unable to get ref HEAD"));
    }

    #[test]
    fn test_commit_log_newest_first_and_limited() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GitRepository::init(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("a.txt"), "a").unwrap();
        commit_all(&repo, "first");
        fs::write(temp_dir.path().join("b.txt"), "b").unwrap();
        commit_all(&repo, "second\n\nbody");

        let all = repo.commit_log(None).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].summary(), "second");
        assert_eq!(all[0].author.name, "Test User");
        assert_eq!(all[1].summary(), "first");

        let limited = repo.commit_log(Some(1)).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, all[0].id);
    }

    #[test]
    fn test_status_reports_untracked_staged_and_modified() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GitRepository::init(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("tracked.txt"), "v1").unwrap();
        commit_all(&repo, "init");
        assert!(repo.status().unwrap().is_clean());

        fs::write(temp_dir.path().join("tracked.txt"), "v2").unwrap();
        fs::write(temp_dir.path().join("new.txt"), "new").unwrap();
        fs::write(temp_dir.path().join("staged.txt"), "staged").unwrap();
        repo.stage(Path::new("staged.txt")).unwrap();

        let status = repo.status().unwrap();
        let codes: Vec<_> = status
            .entries()
            .iter()
            .map(|e| (e.filename.as_str(), e.short_code()))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("new.txt", "??".to_string()),
                ("staged.txt", "A ".to_string()),
                ("tracked.txt", " M".to_string()),
            ]
        );
    }

    #[test]
    fn test_stage_missing_file_records_deletion() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GitRepository::init(temp_dir.path()).unwrap();

        fs::write(temp_dir.path().join("gone.txt"), "bye").unwrap();
        commit_all(&repo, "init");
        fs::remove_file(temp_dir.path().join("gone.txt")).unwrap();

        repo.stage(Path::new("gone.txt")).unwrap();

        let status = repo.status().unwrap();
        assert_eq!(status.entries().len(), 1);
        assert_eq!(status.entries()[0].short_code(), "D ");
    }

    #[test]
    fn test_stage_unknown_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let repo = GitRepository::init(temp_dir.path()).unwrap();

        let err = repo.stage(Path::new("missing.txt")).unwrap_err();
        assert!(matches!(err, GitRepositoryError::StageFailed { .. }));
    }

    #[test]
    fn test_clone_local_repository() {
        let temp_dir = TempDir::new().unwrap();
        let origin_path = temp_dir.path().join("origin");
        let origin = GitRepository::init(&origin_path).unwrap();
        fs::write(origin_path.join("README.md"), "hello").unwrap();
        commit_all(&origin, "init");

        let url = GitUrl::new(origin_path.to_str().unwrap()).unwrap();
        let dest = temp_dir.path().join("work").join("copy");
        let cloned = GitRepository::clone(&url, &dest, &CloneConfig::for_url(&url)).unwrap();

        assert!(dest.join("README.md").exists());
        assert_eq!(cloned.commit_log(None).unwrap().len(), 1);
    }

    #[test]
    fn test_clone_into_existing_repository_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let origin_path = temp_dir.path().join("origin");
        let origin = GitRepository::init(&origin_path).unwrap();
        fs::write(origin_path.join("README.md"), "hello").unwrap();
        commit_all(&origin, "init");

        let url = GitUrl::new(origin_path.to_str().unwrap()).unwrap();
        let err = GitRepository::clone(&url, &origin_path, &CloneConfig::for_url(&url)).unwrap_err();
        assert!(matches!(err, GitRepositoryError::AlreadyExists(_)));
        assert!(origin_path.join("README.md").exists());
    }

    #[test]
    fn test_failed_clone_leaves_no_directory() {
        let temp_dir = TempDir::new().unwrap();
        let url = GitUrl::new(temp_dir.path().join("does-not-exist").to_str().unwrap()).unwrap();
        let dest = temp_dir.path().join("dest");

        let err = GitRepository::clone(&url, &dest, &CloneConfig::for_url(&url)).unwrap_err();
        assert!(matches!(err, GitRepositoryError::CloneFailed { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_failed_clone_keeps_user_created_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let url = GitUrl::new(temp_dir.path().join("does-not-exist").to_str().unwrap()).unwrap();
        let dest = temp_dir.path().join("dest");
        fs::create_dir(&dest).unwrap();

        let err = GitRepository::clone(&url, &dest, &CloneConfig::for_url(&url)).unwrap_err();
        assert!(matches!(err, GitRepositoryError::CloneFailed { .. }));
        assert!(dest.is_dir());
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 0);
    }
}
