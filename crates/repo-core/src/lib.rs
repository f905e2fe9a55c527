//! Managed folders for the content repository
//!
//! A [`Folder`] is a short-lived handle on one directory of the repository.
//! Every mutating call does the physical work through the filesystem
//! collaborators first and then mirrors the change into the metadata index:
//!
//! ```text
//!                    Folder
//!                      |
//!     +-------+--------+---------+----------+
//!     |       |        |         |          |
//! PathResolver  SyncCoordinator  hash  size  protection
//!     |              |
//!  repo-fs        repo-meta
//! ```
//!
//! # Example
//!
//! ```no_run
//! use repo_core::{Folder, FolderContext};
//! use repo_meta::SyncPolicy;
//!
//! fn example() -> repo_core::Result<()> {
//!     let ctx = FolderContext::local("/srv/content", SyncPolicy::default())?;
//!     let folder = Folder::open(&ctx, "files/reports")?;
//!     if !folder.is_empty()? {
//!         folder.purge()?;
//!     }
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod error;
pub mod folder;
pub mod hash;
pub mod logging;
pub mod protection;
pub mod resolver;
pub mod size;
pub mod sync;

pub use context::FolderContext;
pub use error::{Error, Result};
pub use folder::Folder;
pub use resolver::PathResolver;
pub use sync::{SyncAction, SyncCoordinator};
