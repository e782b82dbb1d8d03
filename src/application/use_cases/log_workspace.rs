use super::fan_out::{EntrySender, ExecutorConfig, FanOutExecutor};
use super::scm_failure;
use crate::application::services::result_formatter::{render_commit, LogFormat};
use crate::application::services::workspace_registry::WorkspaceRegistry;
use crate::common::result::{BmoResult, ResultExt};
use crate::domain::entities::repository::RepositoryRef;
use crate::domain::value_objects::commit::CommitInfo;
use crate::infrastructure::scm::SharedScm;
use std::io::Write;
use std::sync::Arc;
use tracing::info;

/// log実行の設定
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 対象のワークスペース名
    pub workspace: String,

    /// 出力形式
    pub format: LogFormat,

    /// リポジトリごとの最大コミット数（Noneの場合は全件）
    pub max_count: Option<usize>,

    /// 最大並列数（Noneの場合はメンバー数）
    pub max_concurrent: Option<usize>,
}

impl LogConfig {
    pub fn new(workspace: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            format: LogFormat::default(),
            max_count: None,
            max_concurrent: None,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_max_count(mut self, max_count: Option<usize>) -> Self {
        self.max_count = max_count;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: Option<usize>) -> Self {
        self.max_concurrent = max_concurrent;
        self
    }
}

/// ワークスペース全体のコミットログを表示するユースケース
pub struct LogWorkspaceUseCase {
    scm: SharedScm,
    config: LogConfig,
}

impl LogWorkspaceUseCase {
    pub fn new(scm: SharedScm, config: LogConfig) -> Self {
        Self { scm, config }
    }

    /// 各メンバーのログを並行して取得し、届いた順に `out` へ書き出す
    pub async fn execute<W: Write>(&self, registry: &WorkspaceRegistry, out: &mut W) -> BmoResult<()> {
        let workspace = registry.lookup(&self.config.workspace)?;
        info!(
            "Reading logs of {} repositories in {}",
            workspace.len(),
            workspace.name()
        );

        let scm = Arc::clone(&self.scm);
        let max_count = self.config.max_count;
        let format = self.config.format;

        let executor = FanOutExecutor::new(
            ExecutorConfig::default().with_max_concurrent(self.config.max_concurrent),
        );
        let report = executor
            .run(
                workspace.members(),
                move |repo: &RepositoryRef, tx: &EntrySender<CommitInfo>| {
                    let commits = scm
                        .commit_log(repo.path(), max_count)
                        .map_err(|e| scm_failure(repo, e))?;
                    for commit in commits {
                        tx.send(commit);
                    }
                    Ok(())
                },
                |repo, commit| {
                    let text = render_commit(&repo.short_name(), &commit, format)?;
                    out.write_all(text.as_bytes())
                        .with_filesystem_error("unable to write log output", None)
                },
            )
            .await?;

        out.flush()
            .with_filesystem_error("unable to write log output", None)?;
        report.into_result()
    }
}
