//! Metadata index for the content repository.
//!
//! Tracks which files and folders under the upload directory are mirrored
//! as records, and keeps those records in step with the physical tree when
//! told to add, move, copy or delete a resource.

pub mod error;
pub mod index;
pub mod policy;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use index::FileIndex;
pub use policy::SyncPolicy;
pub use record::{FileRecord, RecordKind};
pub use store::MetadataStore;
