pub mod add;
pub mod clone;
pub mod log;
pub mod status;

pub use add::*;
pub use clone::*;
pub use log::*;
pub use status::*;

use std::path::PathBuf;

use crate::application::services::RegistrySession;
use crate::common::error::BmoError;
use crate::common::result::BmoResult;
use crate::infrastructure::filesystem::ConfigStore;
use crate::infrastructure::scm::{GitScm, SharedScm};
use crate::presentation::ui::DisplayHelper;
use std::sync::Arc;

/// Settings shared by every command handler
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Registry file given on the command line or via `BMO_CONFIG`
    pub config: Option<PathBuf>,

    /// Directory default clone destinations are derived from
    pub working_dir: PathBuf,

    pub display: DisplayHelper,
}

impl CommandContext {
    pub fn new(config: Option<PathBuf>, working_dir: PathBuf, display: DisplayHelper) -> Self {
        Self {
            config,
            working_dir,
            display,
        }
    }

    /// Load the workspace registry for the duration of one command
    pub fn open_session(&self) -> BmoResult<RegistrySession> {
        let store = ConfigStore::locate(self.config.as_deref()).map_err(|e| {
            BmoError::config_error_with_source(
                format!("unable to locate workspace registry: {e}"),
                None,
                e,
            )
        })?;
        RegistrySession::open(store)
    }

    /// Version control backend used by the handlers
    pub fn scm(&self) -> SharedScm {
        Arc::new(GitScm::new())
    }
}
