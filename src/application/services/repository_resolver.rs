use crate::common::error::BmoError;
use crate::common::result::BmoResult;
use crate::domain::entities::{repository::RepositoryRef, workspace::Workspace};
use crate::domain::value_objects::repo_file::RepoFileSpec;
use std::path::PathBuf;

/// `<repo>/<file>` 指定を解決した結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    /// 対象のメンバーリポジトリ
    pub repository: RepositoryRef,

    /// リポジトリルートからの相対パス
    pub file: PathBuf,
}

/// ファイル指定をワークスペースのメンバーに対応付ける
///
/// リポジトリ名は各メンバーの短縮名と比較し、最初に一致したものを採用する。
pub fn resolve(workspace: &Workspace, spec: &RepoFileSpec) -> BmoResult<ResolvedFile> {
    let repository = workspace
        .find_by_short_name(&spec.repository)
        .ok_or_else(|| BmoError::unknown_repository(spec.repository.clone(), workspace.name()))?;

    Ok(ResolvedFile {
        repository: repository.clone(),
        file: PathBuf::from(&spec.file),
    })
}

/// トークン文字列を解析してから解決
pub fn resolve_token(workspace: &Workspace, token: &str) -> BmoResult<ResolvedFile> {
    resolve(workspace, &RepoFileSpec::parse(token)?)
}
