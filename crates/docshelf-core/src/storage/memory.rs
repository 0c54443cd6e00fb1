//! In-memory storage backend
//!
//! Uses `RefCell` for interior mutability since the library is
//! single-threaded; this lets the `Storage` trait take `&self` everywhere.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use super::{EntryInfo, Storage};

#[derive(Debug, Clone)]
struct MemEntry {
    bytes: Vec<u8>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

/// Storage kept entirely in memory
pub struct MemStorage {
    root: PathBuf,
    files: RefCell<BTreeMap<PathBuf, MemEntry>>,
    unavailable: Cell<bool>,
    broken: RefCell<HashSet<PathBuf>>,
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new("/memory/documents")
    }
}

impl MemStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files: RefCell::new(BTreeMap::new()),
            unavailable: Cell::new(false),
            broken: RefCell::new(HashSet::new()),
        }
    }

    /// Path of an entry under the root
    pub fn root_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Write bytes at any path (inside or outside the root)
    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        let now = Utc::now();
        self.files.borrow_mut().insert(
            path.into(),
            MemEntry {
                bytes: bytes.into(),
                created: now,
                modified: now,
            },
        );
    }

    /// Test helper to set the modification time of an entry.
    /// Returns true if the entry existed.
    pub fn set_modified(&self, path: &Path, modified: DateTime<Utc>) -> bool {
        match self.files.borrow_mut().get_mut(path) {
            Some(entry) => {
                entry.modified = modified;
                true
            }
            None => false,
        }
    }

    /// Make `resolve_root` fail, as when the platform has no document directory
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    /// Make stat and delete fail for one path
    pub fn break_entry(&self, path: impl Into<PathBuf>) {
        self.broken.borrow_mut().insert(path.into());
    }

    /// Number of stored entries, anywhere
    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }

    fn check_broken(&self, path: &Path) -> io::Result<()> {
        if self.broken.borrow().contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "simulated failure",
            ));
        }
        Ok(())
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{:?} not found", path))
}

impl Storage for MemStorage {
    fn resolve_root(&self) -> io::Result<PathBuf> {
        if self.unavailable.get() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "document directory not available",
            ));
        }
        Ok(self.root.clone())
    }

    fn list_entries(&self, root: &Path) -> io::Result<Vec<String>> {
        Ok(self
            .files
            .borrow()
            .keys()
            .filter(|path| path.parent() == Some(root))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect())
    }

    fn stat_entry(&self, path: &Path) -> io::Result<EntryInfo> {
        self.check_broken(path)?;
        let files = self.files.borrow();
        let entry = files.get(path).ok_or_else(|| not_found(path))?;
        Ok(EntryInfo {
            size: entry.bytes.len() as u64,
            created: Some(entry.created),
            modified: Some(entry.modified),
        })
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .borrow()
            .get(path)
            .map(|entry| entry.bytes.clone())
            .ok_or_else(|| not_found(path))
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let bytes = self.read(src)?;
        self.insert(dst, bytes);
        Ok(())
    }

    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        let mut files = self.files.borrow_mut();
        let entry = files.remove(src).ok_or_else(|| not_found(src))?;
        files.insert(dst.to_path_buf(), entry);
        Ok(())
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        self.check_broken(path)?;
        self.files
            .borrow_mut()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| not_found(path))
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path)
    }
}
