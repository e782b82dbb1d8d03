use crate::common::result::BmoResult;
use crate::domain::value_objects::{
    commit::CommitInfo,
    file_status::{StatusEntry, WorktreeStatus},
};
use serde::Serialize;

const INDENT: &str = "    ";
const CLEAN_MESSAGE: &str = "nothing to commit, working tree clean";

/// log の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// `git log` 相当の複数行表示
    #[default]
    Full,
    /// `git log --oneline` 相当
    Oneline,
    /// 1コミット1行のJSON
    Json,
}

/// status の出力形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFormat {
    /// `git status` 相当のバケット表示
    #[default]
    Full,
    /// `git status --short` 相当
    Short,
    /// 1リポジトリ1行のJSON
    Json,
}

#[derive(Serialize)]
struct CommitRecord<'a> {
    repository: &'a str,
    id: &'a str,
    author: &'a str,
    email: &'a str,
    date: String,
    message: &'a str,
}

#[derive(Serialize)]
struct StatusRecord<'a> {
    repository: &'a str,
    clean: bool,
    entries: &'a [StatusEntry],
}

/// 1コミット分の出力（末尾の改行を含む）
pub fn render_commit(repository: &str, commit: &CommitInfo, format: LogFormat) -> BmoResult<String> {
    match format {
        LogFormat::Oneline => Ok(format!(
            "[{}] {} {}\n",
            repository,
            commit.short_id(),
            commit.summary()
        )),
        LogFormat::Full => {
            let block = format!(
                "commit {}\nRepository: {}\nAuthor:     {}\nDate:       {}\n\n{}",
                commit.id,
                repository,
                commit.author,
                commit.author.formatted_date(),
                indent(&commit.message)
            );
            Ok(format!("{}\n\n", block.trim_end()))
        }
        LogFormat::Json => {
            let record = CommitRecord {
                repository,
                id: &commit.id,
                author: &commit.author.name,
                email: &commit.author.email,
                date: commit.author.when().to_rfc3339(),
                message: &commit.message,
            };
            Ok(format!("{}\n", serde_json::to_string(&record)?))
        }
    }
}

/// 1リポジトリ分のステータス出力（末尾の改行を含む）
pub fn render_status(
    repository: &str,
    status: &WorktreeStatus,
    format: StatusFormat,
) -> BmoResult<String> {
    match format {
        StatusFormat::Short => Ok(render_status_short(repository, status)),
        StatusFormat::Full => Ok(render_status_full(repository, status)),
        StatusFormat::Json => {
            let record = StatusRecord {
                repository,
                clean: status.is_clean(),
                entries: status.entries(),
            };
            Ok(format!("{}\n", serde_json::to_string(&record)?))
        }
    }
}

fn render_status_short(repository: &str, status: &WorktreeStatus) -> String {
    if status.is_clean() {
        return format!("[{}] {}\n", repository, CLEAN_MESSAGE);
    }

    status
        .entries()
        .iter()
        .map(|entry| format!("[{}] {} {}\n", repository, entry.short_code(), entry.filename))
        .collect()
}

fn render_status_full(repository: &str, status: &WorktreeStatus) -> String {
    let mut out = format!("Repository: {}\n", repository);

    if status.is_clean() {
        out.push_str(CLEAN_MESSAGE);
        out.push_str("\n\n");
        return out;
    }

    let staged: Vec<_> = status.staged().map(|e| (e.staging.as_str(), e)).collect();
    let unstaged: Vec<_> = status.unstaged().map(|e| (e.worktree.as_str(), e)).collect();
    let untracked: Vec<_> = status.untracked().collect();

    if !staged.is_empty() {
        out.push_str("Changes to be committed:\n\n");
        push_labelled(&mut out, &staged);
        out.push('\n');
    }
    if !unstaged.is_empty() {
        out.push_str("Changes not staged for commit:\n\n");
        push_labelled(&mut out, &unstaged);
        out.push('\n');
    }
    if !untracked.is_empty() {
        out.push_str("Untracked files:\n\n");
        for entry in untracked {
            out.push_str(INDENT);
            out.push_str(&entry.filename);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// `<status>:` ラベルの幅を揃えて出力
fn push_labelled(out: &mut String, entries: &[(&str, &StatusEntry)]) {
    let width = entries.iter().map(|(label, _)| label.len() + 1).max().unwrap_or(0);
    for (label, entry) in entries {
        let label = format!("{}:", label);
        out.push_str(&format!("{}{:<width$} {}\n", INDENT, label, entry.filename, width = width));
    }
}

/// 空でない各行の先頭に4文字のインデントを付ける
pub fn indent(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", INDENT, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
