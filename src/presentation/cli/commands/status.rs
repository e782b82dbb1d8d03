use anyhow::Result;
use std::io;

use super::CommandContext;
use crate::application::services::StatusFormat;
use crate::application::use_cases::{StatusConfig, StatusWorkspaceUseCase};

/// Handler for the status command
pub struct StatusCommand {
    pub workspace: String,
    pub format: StatusFormat,
    pub jobs: Option<usize>,
}

impl StatusCommand {
    pub fn new(workspace: String, format: StatusFormat, jobs: Option<usize>) -> Self {
        Self {
            workspace,
            format,
            jobs,
        }
    }

    pub async fn execute(&self, context: &CommandContext) -> Result<()> {
        let session = context.open_session()?;

        let config = StatusConfig::new(&self.workspace)
            .with_format(self.format)
            .with_max_concurrent(self.jobs);
        let use_case = StatusWorkspaceUseCase::new(context.scm(), config);

        let stdout = io::stdout();
        let mut out = stdout.lock();
        use_case.execute(session.registry(), &mut out).await?;

        session.commit()?;
        Ok(())
    }
}
