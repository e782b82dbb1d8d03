use anyhow::Result;
use std::io;
use tracing::debug;

use super::CommandContext;
use crate::application::services::LogFormat;
use crate::application::use_cases::{LogConfig, LogWorkspaceUseCase};

/// Handler for the log command
pub struct LogCommand {
    pub workspace: String,
    pub format: LogFormat,
    pub max_count: Option<usize>,
    pub jobs: Option<usize>,
}

impl LogCommand {
    pub fn new(
        workspace: String,
        format: LogFormat,
        max_count: Option<usize>,
        jobs: Option<usize>,
    ) -> Self {
        Self {
            workspace,
            format,
            max_count,
            jobs,
        }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let session = context.open_session()?;

        let config = LogConfig::new(&self.workspace)
            .with_format(self.format)
            .with_max_count(self.max_count)
            .with_max_concurrent(self.jobs);
        let use_case = LogWorkspaceUseCase::new(context.scm(), config);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        use_case.execute(session.registry(), &mut out).await?;

        debug!("Log of {} finished", self.workspace);
        session.commit()?;
        Ok(())
    }
}
