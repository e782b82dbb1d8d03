use anyhow::Result;
use tracing::info;

use super::CommandContext;
use crate::application::use_cases::AddFilesUseCase;

/// Handler for the add command
pub struct AddCommand {
    pub workspace: String,
    pub files: Vec<String>,
}

impl AddCommand {
    pub fn new(workspace: String, files: Vec<String>) -> Self {
        Self { workspace, files }
    }

    pub fn execute(&self, context: &CommandContext) -> Result<()> {
        let session = context.open_session()?;

        let staged = AddFilesUseCase::new(context.scm()).execute(
            session.registry(),
            &self.workspace,
            &self.files,
        )?;

        for file in &staged {
            info!(
                "Staged {} in {}",
                file.file.display(),
                file.repository.short_name()
            );
        }

        session.commit()?;
        Ok(())
    }
}
