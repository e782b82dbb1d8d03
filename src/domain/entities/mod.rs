pub mod repository;
pub mod workspace;

pub use repository::RepositoryRef;
pub use workspace::Workspace;
