use anyhow::Result;
use std::path::PathBuf;

use super::CommandContext;
use crate::application::use_cases::{CloneRepositoryUseCase, CloneRequest};
use crate::infrastructure::scm::CloneOptions;

/// Handler for the clone command
pub struct CloneCommand {
    pub workspace: String,
    pub url: String,
    pub path: Option<PathBuf>,
}

impl CloneCommand {
    pub fn new(workspace: String, url: String, path: Option<PathBuf>) -> Self {
        Self {
            workspace,
            url,
            path,
        }
    }

    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let mut session = context.open_session()?;

        let request = CloneRequest::new(&self.workspace, &self.url, &context.working_dir)
            .with_destination(self.path.clone());
        let progress = context
            .display
            .create_transfer_bar(&format!("Cloning {}", self.url));
        let options = CloneOptions {
            progress: Some(progress.clone()),
        };

        let result = CloneRepositoryUseCase::new(context.scm()).execute(
            session.registry_mut(),
            &request,
            &options,
        );
        progress.finish_and_clear();
        let destination = result?;

        session.commit()?;
        context.display.success(&format!(
            "Cloned {} into {}",
            context.display.repo_name(&self.url),
            destination.display()
        ));
        Ok(())
    }
}
