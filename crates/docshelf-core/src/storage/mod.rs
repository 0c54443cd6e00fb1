//! Storage layer
//!
//! Abstracts the directory that holds documents so the repository can run
//! against the real filesystem or an in-memory store.
//!
//! ## Backends
//!
//! - **FsStorage**: a directory on disk (created on demand)
//! - **MemStorage**: a map of paths to bytes, for tests and embedding

pub mod fs;
pub mod memory;

use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

pub use fs::FsStorage;
pub use memory::MemStorage;

/// Metadata for a single stored entry
#[derive(Debug, Clone, PartialEq)]
pub struct EntryInfo {
    /// Size in bytes
    pub size: u64,
    /// Creation time, if the platform reports one
    pub created: Option<DateTime<Utc>>,
    /// Last modification time, if the platform reports one
    pub modified: Option<DateTime<Utc>>,
}

/// Raw storage I/O used by the document repository
///
/// This trait handles the "how" of storage (filesystem vs memory), while
/// `DocumentRepository` handles the "what" (naming, metadata, policies).
pub trait Storage {
    /// Resolve the directory that holds all documents
    fn resolve_root(&self) -> io::Result<PathBuf>;

    /// List the names of all entries directly under `root`
    fn list_entries(&self, root: &Path) -> io::Result<Vec<String>>;

    /// Get size and timestamps for an entry
    fn stat_entry(&self, path: &Path) -> io::Result<EntryInfo>;

    /// Read the full contents of an entry
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Copy `src` to `dst`, replacing `dst` if it exists
    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Move `src` to `dst`, replacing `dst` if it exists
    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()>;

    /// Delete an entry
    fn delete(&self, path: &Path) -> io::Result<()>;

    /// Check whether an entry exists
    fn exists(&self, path: &Path) -> bool;

    /// Whether two paths name the same stored entry
    fn same_entry(&self, a: &Path, b: &Path) -> bool {
        a == b
    }
}
