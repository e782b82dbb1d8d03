use super::repository::RepositoryRef;
use crate::common::error::BmoError;
use crate::common::result::BmoResult;
use std::path::{Path, PathBuf};

/// 名前付きのリポジトリ集合（ワークスペース）
///
/// メンバーの順序は登録（clone）順。同じパスは二度登録できない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// ワークスペース名
    name: String,

    /// メンバーリポジトリ（登録順）
    members: Vec<RepositoryRef>,
}

impl Workspace {
    /// メンバーを持たない新しいWorkspaceインスタンスを作成
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            members: Vec::new(),
        }
    }

    /// 既存のパス列からWorkspaceを構築
    ///
    /// 重複したパスは最初の出現だけを残す。
    pub fn with_members<I, P>(name: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut workspace = Self::new(name);
        for path in paths {
            let path = path.into();
            if !workspace.contains(&path) {
                workspace.members.push(RepositoryRef::new(path));
            }
        }
        workspace
    }

    /// ワークスペース名
    pub fn name(&self) -> &str {
        &self.name
    }

    /// メンバーリポジトリ
    pub fn members(&self) -> &[RepositoryRef] {
        &self.members
    }

    /// メンバーのパス一覧
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.members.iter().map(|m| m.path())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// パスが（バイト単位で）一致するメンバーが存在するか
    pub fn contains(&self, path: &Path) -> bool {
        self.members.iter().any(|m| m.path().as_os_str() == path.as_os_str())
    }

    /// メンバーを末尾に追加
    ///
    /// パスの正規化（シンボリックリンク解決、大文字小文字の同一視）は行わない。
    pub fn append(&mut self, path: impl Into<PathBuf>) -> BmoResult<()> {
        let path = path.into();
        if self.contains(&path) {
            return Err(BmoError::DuplicateMember {
                path,
                workspace: self.name.clone(),
            });
        }
        self.members.push(RepositoryRef::new(path));
        Ok(())
    }

    /// 短縮名が一致する最初のメンバーを検索
    pub fn find_by_short_name(&self, short_name: &str) -> Option<&RepositoryRef> {
        self.members.iter().find(|m| m.short_name() == short_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_workspace_is_empty() {
        let workspace = Workspace::new("web");
        assert_eq!(workspace.name(), "web");
        assert!(workspace.is_empty());
        assert_eq!(workspace.len(), 0);
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut workspace = Workspace::new("web");
        workspace.append("/src/frontend").unwrap();
        workspace.append("/src/backend").unwrap();

        let paths: Vec<_> = workspace.paths().collect();
        assert_eq!(paths, vec![Path::new("/src/frontend"), Path::new("/src/backend")]);
    }

    #[test]
    fn test_append_rejects_duplicate_path() {
        let mut workspace = Workspace::new("web");
        workspace.append("/src/frontend").unwrap();

        let result = workspace.append("/src/frontend");
        assert!(matches!(result, Err(BmoError::DuplicateMember { .. })));
        assert_eq!(workspace.len(), 1);
    }

    #[test]
    fn test_append_does_not_normalize_paths() {
        let mut workspace = Workspace::new("web");
        workspace.append("/src/frontend").unwrap();
        workspace.append("/src/frontend/").unwrap();
        workspace.append("/src/./frontend").unwrap();
        assert_eq!(workspace.len(), 3);
    }

    #[test]
    fn test_with_members_drops_duplicates() {
        let workspace = Workspace::with_members("web", ["/a", "/b", "/a"]);
        assert_eq!(workspace.len(), 2);
    }

    #[test]
    fn test_find_by_short_name_first_match_wins() {
        let workspace = Workspace::with_members("web", ["/one/api", "/two/api", "/two/web"]);
        let found = workspace.find_by_short_name("api").unwrap();
        assert_eq!(found.path(), Path::new("/one/api"));
        assert!(workspace.find_by_short_name("missing").is_none());
    }
}
