//! External collaborators
//!
//! Contracts for the backend this crate talks to, plus in-process
//! implementations:
//!
//! - [`FileService`] - `StatFile` / `ReadFile`
//! - [`ObjectService`] - `UpdateObjectMeta`
//! - [`ObjectStore`] - object references backed by cells
//! - [`stream_url`] - direct media URL for a path

pub mod files;
pub mod memory;
pub mod objects;

pub use files::{FileService, stream_url};
pub use memory::{MemoryFileService, MemoryObjectService};
pub use objects::{ObjectService, ObjectState, ObjectStore};
