use crate::common::error::BmoError;
use crate::common::result::BmoResult;
use crate::domain::entities::workspace::Workspace;
use crate::infrastructure::filesystem::config_store::ConfigStore;
use ini::Ini;
use std::path::Path;
use tracing::debug;

/// ワークスペースのセクション名の接頭辞（`[workspace.<name>]`）
pub const WORKSPACE_SECTION_PREFIX: &str = "workspace.";

/// メンバーのパス一覧を保持するキー
pub const REPOS_KEY: &str = "repos";

/// パス一覧の区切り文字
const PATH_SEPARATOR: char = ',';

/// ワークスペース名 → リポジトリパス一覧の対応表
///
/// INIドキュメントをそのまま保持し、ワークスペース以外のセクションやキーも
/// 書き戻し時に失わない。
#[derive(Debug, Clone, Default)]
pub struct WorkspaceRegistry {
    document: Ini,
}

impl WorkspaceRegistry {
    /// 読み込み済みのINIドキュメントから作成
    pub fn from_document(document: Ini) -> Self {
        Self { document }
    }

    /// 書き戻し対象のINIドキュメント
    pub fn document(&self) -> &Ini {
        &self.document
    }

    /// ワークスペースを取得
    ///
    /// セクションが存在しない場合は `WorkspaceNotFound`。
    pub fn lookup(&self, name: &str) -> BmoResult<Workspace> {
        let name = normalize_name(name);
        let section = self
            .document
            .section(Some(section_name(&name)))
            .ok_or_else(|| BmoError::workspace_not_found(name.clone(), self.workspace_names()))?;

        let paths = section.get(REPOS_KEY).map(split_paths).unwrap_or_default();
        Ok(Workspace::with_members(name, paths))
    }

    /// ワークスペースを取得（存在しない場合は空のワークスペース）
    pub fn list_members(&self, name: &str) -> Workspace {
        self.lookup(name)
            .unwrap_or_else(|_| Workspace::new(normalize_name(name)))
    }

    /// メンバーを末尾に追加
    ///
    /// ワークスペースが未登録なら作成する。同じパス（バイト単位で一致）が既に
    /// あれば `DuplicateMember`。
    pub fn append(&mut self, name: &str, path: &Path) -> BmoResult<()> {
        let raw = Self::ensure_storable(path)?;

        let mut workspace = self.list_members(name);
        workspace.append(path)?;

        let joined = workspace
            .paths()
            .map(|p| p.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(",");

        debug!("Registering {} in workspace {}", raw, workspace.name());
        self.document
            .with_section(Some(section_name(workspace.name())))
            .set(REPOS_KEY, joined);
        Ok(())
    }

    /// パスがレジストリにそのまま保存できるか確認
    ///
    /// UTF-8 で、空でなく、前後に空白がなく、`,` を含まないこと。
    pub fn ensure_storable(path: &Path) -> BmoResult<&str> {
        let raw = path.to_str().ok_or_else(|| {
            BmoError::validation_error(
                "path",
                "repository path must be valid UTF-8",
                Some(path.display().to_string()),
            )
        })?;
        if raw.contains(PATH_SEPARATOR) || raw.trim() != raw || raw.is_empty() {
            return Err(BmoError::validation_error(
                "path",
                "repository path cannot be stored in the registry (empty, surrounding whitespace or ',')",
                Some(raw.to_string()),
            ));
        }
        Ok(raw)
    }

    /// 登録されているワークスペース名（昇順）
    pub fn workspace_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .document
            .sections()
            .flatten()
            .filter_map(|section| section.strip_prefix(WORKSPACE_SECTION_PREFIX))
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn section_name(name: &str) -> String {
    format!("{}{}", WORKSPACE_SECTION_PREFIX, name)
}

fn split_paths(value: &str) -> Vec<String> {
    value
        .split(PATH_SEPARATOR)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// 1回のコマンド実行の間だけ有効なレジストリのセッション
///
/// 開始時に一度だけ読み込み、`commit` で一度だけ書き戻す。`commit` せずに
/// 破棄した場合、メモリ上の変更は捨てられる。
#[derive(Debug)]
pub struct RegistrySession {
    store: ConfigStore,
    registry: WorkspaceRegistry,
    committed: bool,
}

impl RegistrySession {
    /// レジストリファイルを読み込んでセッションを開始
    pub fn open(store: ConfigStore) -> BmoResult<Self> {
        let document = store.load().map_err(|e| {
            BmoError::config_error_with_source(
                format!("unable to load workspace registry: {e}"),
                Some(store.path().to_path_buf()),
                e,
            )
        })?;

        Ok(Self {
            store,
            registry: WorkspaceRegistry::from_document(document),
            committed: false,
        })
    }

    pub fn registry(&self) -> &WorkspaceRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WorkspaceRegistry {
        &mut self.registry
    }

    /// レジストリ全体をアトミックに書き戻す
    pub fn commit(mut self) -> BmoResult<()> {
        self.committed = true;
        self.store.save(self.registry.document()).map_err(|e| {
            BmoError::config_error_with_source(
                format!("unable to save workspace registry: {e}"),
                Some(self.store.path().to_path_buf()),
                e,
            )
        })
    }
}

impl Drop for RegistrySession {
    fn drop(&mut self) {
        if !self.committed {
            debug!(
                "Discarding uncommitted registry session for {}",
                self.store.path().display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn registry_from(content: &str) -> WorkspaceRegistry {
        WorkspaceRegistry::from_document(Ini::load_from_str(content).unwrap())
    }

    #[test]
    fn test_lookup_existing_workspace() {
        let registry = registry_from("[workspace.web]\nrepos = /src/frontend, /src/backend\n");

        let workspace = registry.lookup("web").unwrap();
        let paths: Vec<_> = workspace.paths().collect();
        assert_eq!(
            paths,
            vec![Path::new("/src/frontend"), Path::new("/src/backend")]
        );
    }

    #[test]
    fn test_lookup_missing_workspace_lists_known_names() {
        let registry = registry_from("[workspace.web]\nrepos = /a\n[workspace.api]\nrepos = /b\n");

        let err = registry.lookup("tools").unwrap_err();
        assert!(matches!(err, BmoError::WorkspaceNotFound { .. }));
        assert_eq!(
            err.to_string(),
            "tools does not exist (known workspaces: api, web)"
        );
    }

    #[test]
    fn test_empty_items_are_ignored() {
        let registry = registry_from("[workspace.web]\nrepos = /a,, /b ,\n");
        assert_eq!(registry.lookup("web").unwrap().len(), 2);
    }

    #[test]
    fn test_section_without_repos_key_is_empty() {
        let registry = registry_from("[workspace.web]\n");
        assert!(registry.lookup("web").unwrap().is_empty());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let registry = registry_from("[workspace.web]\nrepos = /a\n");
        assert_eq!(registry.lookup("WEB").unwrap().len(), 1);
    }

    #[test]
    fn test_list_members_is_tolerant() {
        let registry = WorkspaceRegistry::default();
        let workspace = registry.list_members("new");
        assert_eq!(workspace.name(), "new");
        assert!(workspace.is_empty());
    }

    #[test]
    fn test_append_creates_and_extends_workspace() {
        let mut registry = WorkspaceRegistry::default();
        registry.append("web", Path::new("/src/a")).unwrap();
        registry.append("web", Path::new("/src/b")).unwrap();

        assert_eq!(
            registry.document().get_from(Some("workspace.web"), "repos"),
            Some("/src/a,/src/b")
        );
        assert_eq!(registry.workspace_names(), vec!["web".to_string()]);
    }

    #[test]
    fn test_append_rejects_duplicate() {
        let mut registry = registry_from("[workspace.web]\nrepos = /src/a\n");
        let err = registry.append("web", Path::new("/src/a")).unwrap_err();
        assert!(matches!(err, BmoError::DuplicateMember { .. }));
        assert_eq!(
            registry.document().get_from(Some("workspace.web"), "repos"),
            Some("/src/a")
        );
    }

    #[test]
    fn test_append_rejects_unrepresentable_path() {
        let mut registry = WorkspaceRegistry::default();
        let err = registry.append("web", Path::new("/src/a,b")).unwrap_err();
        assert!(matches!(err, BmoError::ValidationError { .. }));
        assert!(registry.workspace_names().is_empty());
    }

    #[test]
    fn test_other_sections_survive() {
        let mut registry = registry_from("[core]\neditor = vim\n[workspace.web]\nrepos = /a\n");
        registry.append("web", Path::new("/b")).unwrap();
        assert_eq!(registry.document().get_from(Some("core"), "editor"), Some("vim"));
    }

    #[test]
    fn test_session_commit_persists_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path: PathBuf = temp_dir.path().join(".bmoconfig");

        let mut session = RegistrySession::open(ConfigStore::new(&path)).unwrap();
        session
            .registry_mut()
            .append("web", Path::new("/src/a"))
            .unwrap();
        session.commit().unwrap();

        let reopened = RegistrySession::open(ConfigStore::new(&path)).unwrap();
        assert_eq!(reopened.registry().lookup("web").unwrap().len(), 1);
    }

    #[test]
    fn test_session_dropped_without_commit_discards_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(".bmoconfig");

        {
            let mut session = RegistrySession::open(ConfigStore::new(&path)).unwrap();
            session
                .registry_mut()
                .append("web", Path::new("/src/a"))
                .unwrap();
        }

        assert!(!path.exists());
    }
}
