//! 統合テスト用の共通ヘルパー
//!
//! `tempfile` 上に git2 でリポジトリを作り、コミットやレジストリファイルを用意する。

#![allow(dead_code)]

use git2::{IndexAddOption, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// テスト用の一時リポジトリ
pub struct ScratchRepo {
    pub path: PathBuf,
    pub repo: Repository,
}

impl ScratchRepo {
    /// `parent/name` に空のリポジトリを作成
    pub fn init(parent: &Path, name: &str) -> Self {
        let path = parent.join(name);
        let repo = Repository::init(&path).expect("failed to init scratch repository");
        Self { path, repo }
    }

    /// ワークツリーにファイルを書き込む
    pub fn write(&self, file: &str, content: &str) -> &Self {
        let target = self.path.join(file);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(target, content).unwrap();
        self
    }

    /// ワークツリーの全ファイルをステージしてコミット
    pub fn commit_all(&self, message: &str) -> git2::Oid {
        let mut index = self.repo.index().unwrap();
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .unwrap();
        index.update_all(["*"].iter(), None).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();

        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parents: Vec<git2::Commit> = match self.repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => Vec::new(),
        };
        let parent_refs: Vec<&git2::Commit> = parents.iter().collect();

        self.repo
            .commit(
                Some("HEAD"),
                &signature,
                &signature,
                message,
                &tree,
                &parent_refs,
            )
            .unwrap()
    }

    /// インデックスに登録されているか
    pub fn is_staged(&self, file: &str) -> bool {
        let index = self.repo.index().unwrap();
        index.get_path(Path::new(file), 0).is_some()
    }
}

/// 1コミット済みのリポジトリを作成
pub fn committed_repo(parent: &Path, name: &str) -> ScratchRepo {
    let repo = ScratchRepo::init(parent, name);
    repo.write("README.md", &format!("# {}\n", name));
    repo.commit_all(&format!("Initial commit of {}", name));
    repo
}

/// ワークスペース定義を含むレジストリファイルを書き出す
pub fn write_registry(dir: &TempDir, workspace: &str, members: &[&Path]) -> PathBuf {
    let path = dir.path().join(".bmoconfig");
    let repos: Vec<String> = members.iter().map(|p| p.display().to_string()).collect();
    fs::write(
        &path,
        format!("[workspace.{}]\nrepos = {}\n", workspace, repos.join(",")),
    )
    .unwrap();
    path
}
