use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// ワークスペースに登録されたリポジトリへの参照
///
/// 短縮名（パスの最後の要素）は保存せず、必要な時に毎回パスから導出する。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    /// 作業コピーのパス（登録された文字列そのまま）
    path: PathBuf,
}

impl RepositoryRef {
    /// 新しいRepositoryRefインスタンスを作成
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// リポジトリのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 短縮名（パスの最後の要素）を取得
    ///
    /// `/src/api` と `/src/api/` はどちらも `api` になる。
    /// 最後の要素が無いパス（`/` など）はパス全体を返す。
    pub fn short_name(&self) -> String {
        short_name_of(&self.path)
    }
}

/// パスの最後の要素を短縮名として取得
pub fn short_name_of(path: &Path) -> String {
    match path.file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => path.to_string_lossy().into_owned(),
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

impl From<PathBuf> for RepositoryRef {
    fn from(path: PathBuf) -> Self {
        Self::new(path)
    }
}
