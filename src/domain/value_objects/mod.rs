pub mod commit;
pub mod file_status;
pub mod git_url;
pub mod repo_file;

pub use commit::{CommitInfo, Signature};
pub use file_status::{StatusCode, StatusEntry, WorktreeStatus};
pub use git_url::{GitUrl, GitUrlError, Transport};
pub use repo_file::RepoFileSpec;
