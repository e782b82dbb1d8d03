pub mod add_files;
pub mod clone_repository;
pub mod fan_out;
pub mod log_workspace;
pub mod status_workspace;

pub use add_files::AddFilesUseCase;
pub use clone_repository::{CloneRepositoryUseCase, CloneRequest};
pub use fan_out::{EntrySender, ExecutorConfig, FanOutExecutor, FanOutReport};
pub use log_workspace::{LogConfig, LogWorkspaceUseCase};
pub use status_workspace::{StatusConfig, StatusWorkspaceUseCase};

use crate::common::error::BmoError;
use crate::domain::entities::repository::RepositoryRef;
use crate::infrastructure::scm::ScmError;

/// VCSのエラーを対象リポジトリ付きのエラーに変換
pub(crate) fn scm_failure(repo: &RepositoryRef, error: ScmError) -> BmoError {
    BmoError::git_error_with_source(error.to_string(), Some(repo.short_name()), error)
}
