pub mod credentials;
pub mod repository;

// Re-export main types for convenience
pub use credentials::AuthStrategy;
pub use repository::{CloneConfig, GitRepository, GitRepositoryError};
