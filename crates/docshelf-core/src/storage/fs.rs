//! Filesystem storage backend
//!
//! Documents are plain files directly under a single directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use super::{EntryInfo, Storage};

/// Storage rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The configured root, whether or not it exists yet
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for FsStorage {
    fn resolve_root(&self) -> io::Result<PathBuf> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            debug!("Created document directory {:?}", self.root);
        }
        if !self.root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{:?} is not a directory", self.root),
            ));
        }
        Ok(self.root.clone())
    }

    fn list_entries(&self, root: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!("Skipping entry with non UTF-8 name: {:?}", raw),
            }
        }
        Ok(names)
    }

    fn stat_entry(&self, path: &Path) -> io::Result<EntryInfo> {
        let meta = fs::metadata(path)?;
        Ok(EntryInfo {
            size: meta.len(),
            created: meta.created().ok().map(DateTime::<Utc>::from),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn copy(&self, src: &Path, dst: &Path) -> io::Result<()> {
        fs::copy(src, dst).map(|_| ())
    }

    fn rename(&self, src: &Path, dst: &Path) -> io::Result<()> {
        match fs::rename(src, dst) {
            Ok(()) => Ok(()),
            // rename cannot cross filesystems, e.g. out of a tmpfs temp dir
            Err(e) if src.is_file() => {
                debug!("Rename {:?} failed ({}), copying instead", src, e);
                fs::copy(src, dst)?;
                fs::remove_file(src)
            }
            Err(e) => Err(e),
        }
    }

    fn delete(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn same_entry(&self, a: &Path, b: &Path) -> bool {
        match (fs::canonicalize(a), fs::canonicalize(b)) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}
