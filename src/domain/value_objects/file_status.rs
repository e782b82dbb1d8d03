use serde::Serialize;
use std::fmt;

/// ファイルの状態コード
///
/// ステージング（インデックス）側とワークツリー側でそれぞれ独立に持つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusCode {
    Unmodified,
    Untracked,
    Modified,
    Added,
    Deleted,
    Renamed,
    Copied,
}

impl StatusCode {
    /// short形式で使う1文字のコード
    pub fn code(&self) -> char {
        match self {
            Self::Unmodified => ' ',
            Self::Untracked => '?',
            Self::Modified => 'M',
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Renamed => 'R',
            Self::Copied => 'C',
        }
    }

    /// 変更を表すコードか（modified / added / deleted / renamed / copied）
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Self::Modified | Self::Added | Self::Deleted | Self::Renamed | Self::Copied
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unmodified => "unmodified",
            Self::Untracked => "untracked",
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 1ファイル分のステータス
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// リポジトリルートからの相対パス
    pub filename: String,

    /// ステージング側の状態
    pub staging: StatusCode,

    /// ワークツリー側の状態
    pub worktree: StatusCode,
}

impl StatusEntry {
    pub fn new(filename: impl Into<String>, staging: StatusCode, worktree: StatusCode) -> Self {
        Self {
            filename: filename.into(),
            staging,
            worktree,
        }
    }

    /// 未追跡ファイルのエントリを作成（両側とも `?`）
    pub fn untracked(filename: impl Into<String>) -> Self {
        Self::new(filename, StatusCode::Untracked, StatusCode::Untracked)
    }

    /// short形式の2文字コード（例: `"M "`、`"??"`）
    pub fn short_code(&self) -> String {
        format!("{}{}", self.staging.code(), self.worktree.code())
    }

    /// コミット対象としてステージされているか
    pub fn is_staged(&self) -> bool {
        self.staging.is_change()
    }

    /// ステージされていない変更があるか
    pub fn is_unstaged(&self) -> bool {
        self.worktree.is_change()
    }

    pub fn is_untracked(&self) -> bool {
        self.worktree == StatusCode::Untracked
    }
}

/// 1リポジトリ分のワークツリーステータス
///
/// エントリはファイル名の辞書順に並べる。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorktreeStatus {
    entries: Vec<StatusEntry>,
}

impl WorktreeStatus {
    pub fn new(mut entries: Vec<StatusEntry>) -> Self {
        entries.sort_by(|a, b| a.filename.cmp(&b.filename));
        Self { entries }
    }

    pub fn entries(&self) -> &[StatusEntry] {
        &self.entries
    }

    /// コミットすべき変更が無いか
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn staged(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.is_staged())
    }

    pub fn unstaged(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.is_unstaged())
    }

    pub fn untracked(&self) -> impl Iterator<Item = &StatusEntry> {
        self.entries.iter().filter(|e| e.is_untracked())
    }
}
