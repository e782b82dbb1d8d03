use super::scm_failure;
use crate::application::services::workspace_registry::WorkspaceRegistry;
use crate::common::error::BmoError;
use crate::common::result::{BmoResult, OptionExt};
use crate::domain::entities::repository::{short_name_of, RepositoryRef};
use crate::domain::value_objects::git_url::GitUrl;
use crate::infrastructure::scm::{CloneOptions, SharedScm};
use std::path::PathBuf;
use tracing::info;

/// clone実行の設定
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// 登録先のワークスペース名
    pub workspace: String,

    /// clone元のURL
    pub url: String,

    /// clone先（指定された場合はそのまま使う）
    pub destination: Option<PathBuf>,

    /// clone先を省略した場合の基準ディレクトリ
    pub working_dir: PathBuf,
}

impl CloneRequest {
    pub fn new(workspace: impl Into<String>, url: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace: workspace.into(),
            url: url.into(),
            destination: None,
            working_dir: working_dir.into(),
        }
    }

    pub fn with_destination(mut self, destination: Option<PathBuf>) -> Self {
        self.destination = destination;
        self
    }
}

/// リポジトリをcloneしてワークスペースに登録するユースケース
pub struct CloneRepositoryUseCase {
    scm: SharedScm,
}

impl CloneRepositoryUseCase {
    pub fn new(scm: SharedScm) -> Self {
        Self { scm }
    }

    /// clone先のパスを決定
    ///
    /// 省略時は `<working_dir>/<URLの最後の要素から .git を除いたもの>`。
    pub fn destination_for(request: &CloneRequest, url: &GitUrl) -> BmoResult<PathBuf> {
        if let Some(destination) = &request.destination {
            return Ok(destination.clone());
        }
        let name = url
            .repo_name()
            .ok_or_validation_error("url", "unable to derive a directory name from the URL")?;
        Ok(request.working_dir.join(name))
    }

    /// cloneを実行し、成功した場合のみレジストリに追加する
    ///
    /// clone先が既にメンバーの場合、または同じ短縮名のメンバーが既にある場合は
    /// VCSを呼ばずに失敗する。
    pub fn execute(
        &self,
        registry: &mut WorkspaceRegistry,
        request: &CloneRequest,
        options: &CloneOptions,
    ) -> BmoResult<PathBuf> {
        let url = GitUrl::new(&request.url).map_err(|e| {
            BmoError::validation_error("url", e.to_string(), Some(request.url.clone()))
        })?;
        let destination = Self::destination_for(request, &url)?;
        WorkspaceRegistry::ensure_storable(&destination)?;

        let workspace = registry.list_members(&request.workspace);
        if workspace.contains(&destination) {
            return Err(BmoError::AlreadyMember {
                url: url.to_string(),
                path: destination,
                workspace: workspace.name().to_string(),
            });
        }

        let name = short_name_of(&destination);
        if let Some(existing) = workspace.find_by_short_name(&name) {
            return Err(BmoError::AmbiguousRepository {
                name,
                path: destination,
                existing: existing.path().to_path_buf(),
                workspace: workspace.name().to_string(),
            });
        }

        info!("Cloning {} into {}", url, destination.display());
        let repo = RepositoryRef::new(&destination);
        self.scm
            .clone_repository(&url, &destination, options)
            .map_err(|e| {
                if e.is_already_exists() {
                    info!("{} already exists, leaving it untouched", destination.display());
                }
                scm_failure(&repo, e)
            })?;

        registry.append(&request.workspace, &destination)?;
        Ok(destination)
    }
}
