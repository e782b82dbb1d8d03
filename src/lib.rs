//! # bmo - Many repositories, one workspace
//!
//! `bmo` lets you treat a set of independently cloned git repositories as one logical
//! workspace. Workspaces are named lists of local repository paths kept in a small INI
//! registry (`~/.bmoconfig`), and every command fans out over the members of a workspace.
//!
//! ## Features
//!
//! - **Clone and register**: Clone a repository and add it to a workspace in one step
//! - **Aggregated log**: Commit logs of every member, prefixed with the repository name
//! - **Aggregated status**: Working tree status of every member
//! - **Cross-repository staging**: Stage files addressed as `<repo>/<file>`
//!
//! ## Quick Start
//!
//! ```bash
//! bmo clone web https://github.com/example/frontend.git
//! bmo clone web git@github.com:example/backend.git
//! bmo status --short web
//! bmo log --oneline -n 5 web
//! bmo add web frontend/src/app.ts,backend/README.md
//! ```
//!
//! The registry written by the commands above looks like this:
//!
//! ```ini
//! [workspace.web]
//! repos = /home/dev/frontend,/home/dev/backend
//! ```
//!
//! ## Architecture
//!
//! The crate is organized using clean architecture principles:
//!
//! - [`domain`]: Workspaces, repository references and the value objects they use
//! - [`application`]: The workspace registry, formatters and the command use cases
//! - [`infrastructure`]: libgit2 access and the registry file
//! - [`presentation`]: CLI interface and user interaction
//! - [`common`]: Shared error handling
//!
//! ## Using the Library
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bmo::application::services::{RegistrySession, StatusFormat};
//! use bmo::application::use_cases::{StatusConfig, StatusWorkspaceUseCase};
//! use bmo::infrastructure::filesystem::ConfigStore;
//! use bmo::infrastructure::scm::GitScm;
//!
//! # async fn example() -> bmo::Result<()> {
//! let store = ConfigStore::new("/home/dev/.bmoconfig");
//! let session = RegistrySession::open(store)?;
//!
//! let config = StatusConfig::new("web").with_format(StatusFormat::Short);
//! let use_case = StatusWorkspaceUseCase::new(Arc::new(GitScm::new()), config);
//! use_case.execute(session.registry(), &mut std::io::stdout()).await?;
//!
//! session.commit()?;
//! # Ok(())
//! # }
//! ```

#![deny(rustdoc::broken_intra_doc_links)]

pub mod application;
pub mod common;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

// Re-export commonly used types for convenience
pub use crate::common::error::BmoError;
pub use crate::common::result::BmoResult as Result;
