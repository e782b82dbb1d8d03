pub mod repository_resolver;
pub mod result_formatter;
pub mod workspace_registry;

pub use repository_resolver::{resolve, ResolvedFile};
pub use result_formatter::{LogFormat, StatusFormat};
pub use workspace_registry::{RegistrySession, WorkspaceRegistry};
