use super::fan_out::{EntrySender, ExecutorConfig, FanOutExecutor};
use super::scm_failure;
use crate::application::services::result_formatter::{render_status, StatusFormat};
use crate::application::services::workspace_registry::WorkspaceRegistry;
use crate::common::result::{BmoResult, ResultExt};
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::value_objects::file_status::WorktreeStatus;
use crate::infrastructure::scm::SharedScm;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// status実行の設定
#[derive(Debug, Clone)]
pub struct StatusConfig {
    /// 対象のワークスペース名
    pub workspace: String,

    /// 出力形式
    pub format: StatusFormat,

    /// 最大並列数（Noneの場合はメンバー数）
    pub max_concurrent: Option<usize>,
}

impl StatusConfig {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            format: StatusFormat::default(),
            max_concurrent: None,
        }
    }

    pub fn with_format(mut self, format: StatusFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// ワークスペース全体のワークツリー状態を表示するユースケース
pub struct StatusWorkspaceUseCase {
    scm: SharedScm,
    config: StatusConfig,
}

impl StatusWorkspaceUseCase {
    pub fn new(scm: SharedScm, config: StatusConfig) -> Self {
        Self { scm, config }
    }

    /// 各メンバーの状態を並行して取得し、リポジトリ単位で `out` へ書き出す
    pub async fn execute<W: Write>(&self, registry: &WorkspaceRegistry, out: &mut W) -> BmoResult<()> {
        let workspace = registry.lookup(&self.config.workspace)?;
        info!(
            "Checking status of {} repositories in {}",
            workspace.len(),
            workspace.name()
        );

        let scm = Arc::clone(&self.scm);
        let format = self.config.format;

        let executor = FanOutExecutor::new(
            ExecutorConfig::default().with_max_concurrent(self.config.max_concurrent),
        );
        let report = executor
            .run(
                workspace.members(),
                move |repo: &RepositoryRef, tx: &EntrySender<WorktreeStatus>| {
                    let status = scm.status(repo.path()).map_err(|e| scm_failure(repo, e))?;
                    tx.send(status);
                    Ok(())
                },
                |repo, status| {
                    let text = render_status(&repo.short_name(), &status, format)?;
                    out.write_all(text.as_bytes())
                        .with_filesystem_error("unable to write status output", None)
                },
            )
            .await?;

        out.flush()
            .with_filesystem_error("unable to write status output", None)?;
        report.into_result()
    }
}
