/// Source control operations
///
/// `ScmOperations` is the seam the application layer talks to; `GitScm`
/// implements it with libgit2.
pub mod git_scm;
pub mod scm_interface;

pub use git_scm::GitScm;
pub use scm_interface::{CloneOptions, ScmError, ScmOperations, SharedScm};
