//! Key-value persistence
//!
//! A small string-to-string store used for preferences. The file backend
//! keeps every key in one JSON object and uses atomic writes (write to temp
//! file, then rename) to prevent corruption.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// String key-value persistence
pub trait KeyValueStore {
    /// Get the value for a key, `None` if absent
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Set the value for a key
    fn set(&self, key: &str, value: &str) -> io::Result<()>;
}

/// Key-value store backed by a JSON file
pub struct FileKeyValueStore {
    path: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_map(&self) -> io::Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.load_map()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        // An unreadable file is replaced rather than blocking every write
        let mut map = self.load_map().unwrap_or_default();
        map.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&map)?;
        atomic_write(&self.path, content.as_bytes())
    }
}

/// Key-value store kept in memory
#[derive(Default)]
pub struct MemKeyValueStore {
    values: RefCell<BTreeMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl KeyValueStore for MemKeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes.get() {
            return Err(io::Error::new(io::ErrorKind::Other, "simulated write error"));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
fn atomic_write(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file = File::create(&temp_path)?;
    file.write_all(data)?;
    file.sync_all()?;

    fs::rename(&temp_path, path)
}
