//! ワークスペース操作の統合テスト
//!
//! 実際の git2 リポジトリに対して、GitScm 経由でユースケースを実行する。

mod common;

use bmo::application::services::{LogFormat, RegistrySession, StatusFormat};
use bmo::application::use_cases::{
    AddFilesUseCase, CloneRepositoryUseCase, CloneRequest, LogConfig, LogWorkspaceUseCase,
    StatusConfig, StatusWorkspaceUseCase,
};
use bmo::common::error::BmoError;
use bmo::infrastructure::filesystem::ConfigStore;
use bmo::infrastructure::scm::{CloneOptions, GitScm, SharedScm};
use common::{committed_repo, write_registry, ScratchRepo};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

fn scm() -> SharedScm {
    Arc::new(GitScm::new())
}

fn open(path: &Path) -> RegistrySession {
    RegistrySession::open(ConfigStore::new(path)).unwrap()
}

fn sorted_lines(out: Vec<u8>) -> Vec<String> {
    let mut lines: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    lines.sort();
    lines
}

#[tokio::test]
async fn test_short_status_across_members() {
    let temp = TempDir::new().unwrap();
    let clean = committed_repo(temp.path(), "clean");
    let dirty = committed_repo(temp.path(), "dirty");
    dirty.write("x.txt", "new file\n");
    dirty.write("README.md", "# changed\n");

    let config = write_registry(&temp, "dev", &[&clean.path, &dirty.path]);
    let session = open(&config);

    let use_case = StatusWorkspaceUseCase::new(
        scm(),
        StatusConfig::new("dev").with_format(StatusFormat::Short),
    );
    let mut out = Vec::new();
    use_case.execute(session.registry(), &mut out).await.unwrap();

    assert_eq!(
        sorted_lines(out),
        vec![
            "[clean] nothing to commit, working tree clean",
            "[dirty]  M README.md",
            "[dirty] ?? x.txt",
        ]
    );
}

#[tokio::test]
async fn test_status_is_stable_on_unchanged_worktree() {
    let temp = TempDir::new().unwrap();
    let repo = committed_repo(temp.path(), "api");
    repo.write("b.txt", "b\n").write("a.txt", "a\n");

    let config = write_registry(&temp, "dev", &[&repo.path]);
    let session = open(&config);
    let use_case = StatusWorkspaceUseCase::new(scm(), StatusConfig::new("dev"));

    let mut first = Vec::new();
    use_case.execute(session.registry(), &mut first).await.unwrap();
    let mut second = Vec::new();
    use_case.execute(session.registry(), &mut second).await.unwrap();

    assert_eq!(first, second);
    let text = String::from_utf8(first).unwrap();
    assert!(text.starts_with("Repository: api\n"));
    assert!(text.find("a.txt").unwrap() < text.find("b.txt").unwrap());
}

#[tokio::test]
async fn test_oneline_log_respects_max_count() {
    let temp = TempDir::new().unwrap();
    let repo = committed_repo(temp.path(), "api");
    repo.write("src/lib.rs", "pub fn answer() -> u32 { 42 }\n");
    repo.commit_all("Add answer\n\nReturns the answer.");

    let config = write_registry(&temp, "dev", &[&repo.path]);
    let session = open(&config);
    let use_case = LogWorkspaceUseCase::new(
        scm(),
        LogConfig::new("dev")
            .with_format(LogFormat::Oneline)
            .with_max_count(Some(1)),
    );

    let mut out = Vec::new();
    use_case.execute(session.registry(), &mut out).await.unwrap();

    let lines = sorted_lines(out);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("[api] "));
    assert!(lines[0].ends_with(" Add answer"));
}

#[tokio::test]
async fn test_log_reports_repository_without_commits() {
    let temp = TempDir::new().unwrap();
    let repo = committed_repo(temp.path(), "api");
    let empty = ScratchRepo::init(temp.path(), "empty");

    let config = write_registry(&temp, "dev", &[&repo.path, &empty.path]);
    let session = open(&config);
    let use_case = LogWorkspaceUseCase::new(
        scm(),
        LogConfig::new("dev").with_format(LogFormat::Oneline),
    );

    let mut out = Vec::new();
    let err = use_case
        .execute(session.registry(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.repository(), Some("empty"));
    assert_eq!(sorted_lines(out).len(), 1);
}

#[test]
fn test_add_stages_files_in_their_repositories() {
    let temp = TempDir::new().unwrap();
    let api = committed_repo(temp.path(), "api");
    let web = committed_repo(temp.path(), "web");
    api.write("src/new.rs", "// new\n");
    web.write("index.html", "<html></html>\n");

    let config = write_registry(&temp, "dev", &[&api.path, &web.path]);
    let session = open(&config);

    let staged = AddFilesUseCase::new(scm())
        .execute(session.registry(), "dev", &["api/src/new.rs,web/index.html"])
        .unwrap();

    assert_eq!(staged.len(), 2);
    assert!(api.is_staged("src/new.rs"));
    assert!(web.is_staged("index.html"));
}

#[test]
fn test_add_stages_deleted_file() {
    let temp = TempDir::new().unwrap();
    let api = committed_repo(temp.path(), "api");
    std::fs::remove_file(api.path.join("README.md")).unwrap();

    let config = write_registry(&temp, "dev", &[&api.path]);
    let session = open(&config);

    AddFilesUseCase::new(scm())
        .execute(session.registry(), "dev", &["api/README.md"])
        .unwrap();

    assert!(!api.is_staged("README.md"));
}

#[test]
fn test_add_unknown_file_fails_with_repository_context() {
    let temp = TempDir::new().unwrap();
    let api = committed_repo(temp.path(), "api");

    let config = write_registry(&temp, "dev", &[&api.path]);
    let session = open(&config);

    let err = AddFilesUseCase::new(scm())
        .execute(session.registry(), "dev", &["api/missing.rs"])
        .unwrap_err();

    assert_eq!(err.repository(), Some("api"));
    assert!(err.to_string().contains("missing.rs"));
}

#[test]
fn test_clone_local_repository_and_register() {
    let temp = TempDir::new().unwrap();
    let origin = committed_repo(&temp.path().join("upstream"), "tools");
    let checkouts = temp.path().join("checkouts");
    let config = temp.path().join(".bmoconfig");

    let mut session = open(&config);
    let request = CloneRequest::new("dev", origin.path.display().to_string(), &checkouts);
    let destination = CloneRepositoryUseCase::new(scm())
        .execute(session.registry_mut(), &request, &CloneOptions::default())
        .unwrap();
    session.commit().unwrap();

    assert_eq!(destination, checkouts.join("tools"));
    assert!(destination.join("README.md").exists());

    let reopened = open(&config);
    let workspace = reopened.registry().lookup("dev").unwrap();
    assert!(workspace.contains(&destination));
}

#[test]
fn test_failed_clone_leaves_no_trace() {
    let temp = TempDir::new().unwrap();
    let checkouts = temp.path().join("checkouts");
    let config = temp.path().join(".bmoconfig");
    let missing = temp.path().join("no-such-repo");

    let mut session = open(&config);
    let request = CloneRequest::new("dev", missing.display().to_string(), &checkouts);
    let err = CloneRepositoryUseCase::new(scm())
        .execute(session.registry_mut(), &request, &CloneOptions::default())
        .unwrap_err();

    assert!(matches!(err, BmoError::GitError { .. }));
    assert!(!checkouts.join("no-such-repo").exists());
    assert!(session.registry().workspace_names().is_empty());
}

#[test]
fn test_clone_into_existing_repository_is_rejected() {
    let temp = TempDir::new().unwrap();
    let origin = committed_repo(&temp.path().join("upstream"), "tools");
    let checkouts = temp.path().join("checkouts");
    let occupied = committed_repo(&checkouts, "tools");
    let config = temp.path().join(".bmoconfig");

    let mut session = open(&config);
    let request = CloneRequest::new("dev", origin.path.display().to_string(), &checkouts);
    let err = CloneRepositoryUseCase::new(scm())
        .execute(session.registry_mut(), &request, &CloneOptions::default())
        .unwrap_err();

    assert_eq!(err.repository(), Some("tools"));
    assert!(occupied.path.join(".git").exists());
    assert!(session.registry().workspace_names().is_empty());
}
