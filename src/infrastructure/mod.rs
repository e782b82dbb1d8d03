/// Infrastructure layer modules
///
/// This layer provides concrete implementations for external system interactions:
/// - Git operations over libgit2 (log, status, stage, clone)
/// - The `ScmOperations` seam the application layer depends on
/// - The INI registry file
pub mod filesystem;
pub mod git;
pub mod scm;

// Re-export commonly used types
pub use filesystem::{ConfigStore, ConfigStoreError};
pub use git::{GitRepository, GitRepositoryError};
pub use scm::{CloneOptions, GitScm, ScmError, ScmOperations, SharedScm};
