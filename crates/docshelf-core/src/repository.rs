//! Document repository
//!
//! Lists, adds and removes documents kept under a storage root. Document
//! records are derived from storage metadata on every call; nothing is
//! cached.
//!
//! Listing order is most recently updated first, with ties broken by name.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{LibraryError, Result};
use crate::models::Document;
use crate::platform::{DocumentPicker, PickedFile, Sharing};
use crate::storage::{EntryInfo, Storage};

/// Extension used for recordings whose artifact has none
const DEFAULT_RECORDING_EXT: &str = "m4a";

/// Repository of documents backed by a `Storage`
pub struct DocumentRepository<S> {
    storage: S,
}

impl<S: Storage> DocumentRepository<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// List every document in the storage root
    ///
    /// Entries whose metadata cannot be read are skipped.
    pub fn list(&self) -> Result<Vec<Document>> {
        let root = self.root()?;
        let names = self
            .storage
            .list_entries(&root)
            .map_err(|e| unavailable(&root, e))?;

        let now = Utc::now();
        let mut docs: Vec<Document> = names
            .into_iter()
            .filter_map(|name| {
                let path = root.join(&name);
                match self.storage.stat_entry(&path) {
                    Ok(info) => Some(document_from_entry(name, &info, now)),
                    Err(e) => {
                        warn!("Skipping {:?}: {}", path, e);
                        None
                    }
                }
            })
            .collect();

        docs.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.name.cmp(&b.name))
        });
        debug!("Listed {} document(s)", docs.len());
        Ok(docs)
    }

    /// List documents whose name contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Result<Vec<Document>> {
        Ok(filter(&self.list()?, query))
    }

    /// Get a single document by id
    pub fn get(&self, id: &str) -> Result<Document> {
        let path = self.entry_path(id)?;
        if !self.storage.exists(&path) {
            return Err(LibraryError::NotFound { id: id.to_string() });
        }
        let info = self
            .storage
            .stat_entry(&path)
            .map_err(|e| LibraryError::from_io(e, id, path.clone()))?;
        Ok(document_from_entry(id.to_string(), &info, Utc::now()))
    }

    /// Get a document with its text content loaded
    ///
    /// Content is only loaded for text-like types that decode as UTF-8.
    pub fn open(&self, id: &str) -> Result<Document> {
        let mut doc = self.get(id)?;
        if doc.is_text() {
            let path = self.entry_path(id)?;
            let bytes = self
                .storage
                .read(&path)
                .map_err(|e| LibraryError::from_io(e, id, path.clone()))?;
            match String::from_utf8(bytes) {
                Ok(text) => doc.content = Some(text),
                Err(_) => debug!("{} is not valid UTF-8, content not shown", id),
            }
        }
        Ok(doc)
    }

    /// Copy a picked file into the library
    ///
    /// An existing document with the same name is overwritten. Picking a
    /// file that is already the stored document leaves it untouched.
    pub fn add(&self, picked: &PickedFile) -> Result<Document> {
        validate_name(&picked.name)?;
        let root = self.root()?;

        if !self.storage.exists(&picked.location) {
            return Err(LibraryError::NotFound {
                id: picked.location.display().to_string(),
            });
        }

        let dest = root.join(&picked.name);
        if self.storage.same_entry(&picked.location, &dest) {
            debug!("{} is already in the library", picked.name);
        } else {
            if self.storage.exists(&dest) {
                info!("Replacing existing document {}", picked.name);
            }
            self.storage
                .copy(&picked.location, &dest)
                .map_err(|e| LibraryError::Io {
                    path: dest.clone(),
                    source: e,
                })?;
        }

        let info = self
            .storage
            .stat_entry(&dest)
            .map_err(|e| LibraryError::from_io(e, &picked.name, dest.clone()))?;
        info!("Added document {} ({} bytes)", picked.name, info.size);
        Ok(document_from_entry(picked.name.clone(), &info, Utc::now()))
    }

    /// Present the picker and add the chosen file
    ///
    /// Returns `None` if the user cancelled.
    pub fn import(&self, picker: &dyn DocumentPicker) -> Result<Option<Document>> {
        match picker.pick().map_err(LibraryError::Picker)? {
            Some(picked) => self.add(&picked).map(Some),
            None => {
                debug!("Import cancelled");
                Ok(None)
            }
        }
    }

    /// Delete a document
    pub fn remove(&self, id: &str) -> Result<()> {
        let path = self.entry_path(id)?;
        self.storage
            .delete(&path)
            .map_err(|e| LibraryError::from_io(e, id, path.clone()))?;
        info!("Removed document {}", id);
        Ok(())
    }

    /// Hand a document to the sharing collaborator
    pub fn share(&self, id: &str, sharing: &dyn Sharing) -> Result<()> {
        let path = self.entry_path(id)?;
        if !self.storage.exists(&path) {
            return Err(LibraryError::NotFound { id: id.to_string() });
        }
        if !sharing.is_available() {
            return Err(LibraryError::SharingUnavailable);
        }
        sharing.share(&path).map_err(|e| LibraryError::Io {
            path: path.clone(),
            source: e,
        })?;
        info!("Shared document {}", id);
        Ok(())
    }

    /// Delete every document, best effort
    ///
    /// Deletions that succeed are not rolled back when a later one fails.
    /// Returns the number of documents removed.
    pub fn clear_all(&self) -> Result<usize> {
        let root = self.root()?;
        let names = self
            .storage
            .list_entries(&root)
            .map_err(|e| unavailable(&root, e))?;

        let mut removed = 0;
        let mut failed = 0;
        for name in names {
            let path = root.join(&name);
            match self.storage.delete(&path) {
                Ok(()) => removed += 1,
                Err(e) => {
                    warn!("Failed to delete {:?}: {}", path, e);
                    failed += 1;
                }
            }
        }

        if failed > 0 {
            return Err(LibraryError::ClearIncomplete { removed, failed });
        }
        info!("Cleared {} document(s)", removed);
        Ok(removed)
    }

    /// Move a finished capture artifact into the library
    ///
    /// The document is named `recording-<epoch millis>.<ext>`, with a numeric
    /// suffix if that name is already taken.
    pub fn store_recording(&self, capture: &Path) -> Result<Document> {
        let root = self.root()?;
        let ext = capture
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_RECORDING_EXT);

        let created = Utc::now();
        let name = self.unused_name(&root, &format!("recording-{}", created.timestamp_millis()), ext);
        let dest = root.join(&name);

        self.storage
            .rename(capture, &dest)
            .map_err(|e| LibraryError::Io {
                path: capture.to_path_buf(),
                source: e,
            })?;

        let size = match self.storage.stat_entry(&dest) {
            Ok(info) => info.size,
            Err(e) => {
                warn!("Could not read size of {:?}: {}", dest, e);
                0
            }
        };
        info!("Stored recording {} ({} bytes)", name, size);
        Ok(Document::recording(name, size, created))
    }

    fn unused_name(&self, root: &Path, base: &str, ext: &str) -> String {
        let mut name = format!("{}.{}", base, ext);
        let mut n = 1;
        while self.storage.exists(&root.join(&name)) {
            name = format!("{}-{}.{}", base, n, ext);
            n += 1;
        }
        name
    }

    fn root(&self) -> Result<PathBuf> {
        self.storage
            .resolve_root()
            .map_err(|e| LibraryError::StorageUnavailable {
                reason: e.to_string(),
            })
    }

    fn entry_path(&self, id: &str) -> Result<PathBuf> {
        validate_id(id)?;
        Ok(self.root()?.join(id))
    }
}

/// Keep the documents whose name contains `query`, ignoring case
///
/// An empty query keeps everything.
pub fn filter(docs: &[Document], query: &str) -> Vec<Document> {
    docs.iter().filter(|doc| doc.matches(query)).cloned().collect()
}

fn document_from_entry(name: String, info: &EntryInfo, now: DateTime<Utc>) -> Document {
    let updated = info.modified.or(info.created).unwrap_or(now);
    let created = info.created.or(info.modified).unwrap_or(now);
    Document::new(name, info.size, created, updated)
}

fn unavailable(root: &Path, e: std::io::Error) -> LibraryError {
    LibraryError::StorageUnavailable {
        reason: format!("cannot read {:?}: {}", root, e),
    }
}

/// Document names must be plain file names
fn validate_name(name: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0']);
    if invalid {
        return Err(LibraryError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Ids of stored documents must name one entry directly under the root
///
/// Looser than `validate_name`: anything `list` can return is accepted,
/// such as a name containing a backslash on unix.
fn validate_id(id: &str) -> Result<()> {
    let mut components = Path::new(id).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(c)), None) if c == OsStr::new(id)
    );
    if !single || id.contains('\0') {
        return Err(LibraryError::InvalidName {
            name: id.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FsStorage, MemStorage};
    use chrono::Duration;
    use std::cell::RefCell;
    use std::io;
    use tempfile::TempDir;

    fn mem_repo() -> DocumentRepository<MemStorage> {
        DocumentRepository::new(MemStorage::default())
    }

    fn seed(repo: &DocumentRepository<MemStorage>, name: &str, bytes: &[u8]) {
        let storage = repo.storage();
        storage.insert(storage.root_path(name), bytes.to_vec());
    }

    struct FakeSharing {
        available: bool,
        shared: RefCell<Vec<PathBuf>>,
    }

    impl FakeSharing {
        fn new(available: bool) -> Self {
            Self {
                available,
                shared: RefCell::new(Vec::new()),
            }
        }
    }

    impl Sharing for FakeSharing {
        fn is_available(&self) -> bool {
            self.available
        }

        fn share(&self, path: &Path) -> io::Result<()> {
            self.shared.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    struct FakePicker(Option<PickedFile>);

    impl DocumentPicker for FakePicker {
        fn pick(&self) -> io::Result<Option<PickedFile>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_list_derives_documents() {
        let repo = mem_repo();
        seed(&repo, "report.PDF", &[0u8; 2048]);
        seed(&repo, "README", b"hello");

        let docs = repo.list().unwrap();
        assert_eq!(docs.len(), 2);

        let report = docs.iter().find(|d| d.id == "report.PDF").unwrap();
        assert_eq!(report.name, "report.PDF");
        assert_eq!(report.size, 2048);
        assert_eq!(report.kind, "pdf");

        let readme = docs.iter().find(|d| d.id == "README").unwrap();
        assert_eq!(readme.kind, "unknown");
    }

    #[test]
    fn test_list_orders_most_recent_first() {
        let repo = mem_repo();
        seed(&repo, "old.txt", b"a");
        seed(&repo, "new.txt", b"b");
        seed(&repo, "also-new.txt", b"c");

        let storage = repo.storage();
        let base = Utc::now();
        storage.set_modified(&storage.root_path("old.txt"), base - Duration::days(2));
        storage.set_modified(&storage.root_path("new.txt"), base);
        storage.set_modified(&storage.root_path("also-new.txt"), base);

        let names: Vec<_> = repo.list().unwrap().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["also-new.txt", "new.txt", "old.txt"]);
    }

    #[test]
    fn test_list_skips_unreadable_entries() {
        let repo = mem_repo();
        seed(&repo, "good.txt", b"ok");
        seed(&repo, "bad.txt", b"no");
        repo.storage().break_entry(repo.storage().root_path("bad.txt"));

        let docs = repo.list().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "good.txt");
    }

    #[test]
    fn test_list_storage_unavailable() {
        let repo = mem_repo();
        repo.storage().set_unavailable(true);

        let err = repo.list().unwrap_err();
        assert!(matches!(err, LibraryError::StorageUnavailable { .. }));
    }

    #[test]
    fn test_add_then_list_includes_once() {
        let repo = mem_repo();
        repo.storage().insert("/picker/cache/Budget.xlsx", vec![7u8; 1234]);

        let picked = PickedFile::new("Budget.xlsx", "/picker/cache/Budget.xlsx");
        let added = repo.add(&picked).unwrap();
        assert_eq!(added.size, 1234);
        assert_eq!(added.kind, "xlsx");

        let docs = repo.list().unwrap();
        let matching: Vec<_> = docs.iter().filter(|d| d.id == "Budget.xlsx").collect();
        assert_eq!(matching.len(), 1);
        assert_eq!(matching[0].size, 1234);
    }

    #[test]
    fn test_add_overwrites_same_name() {
        let repo = mem_repo();
        seed(&repo, "notes.txt", b"old");
        repo.storage().insert("/picker/notes.txt", b"newer contents".to_vec());

        let added = repo
            .add(&PickedFile::new("notes.txt", "/picker/notes.txt"))
            .unwrap();
        assert_eq!(added.size, 14);

        let docs = repo.list().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].size, 14);
    }

    #[test]
    fn test_add_missing_source() {
        let repo = mem_repo();
        let err = repo
            .add(&PickedFile::new("ghost.txt", "/picker/ghost.txt"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_add_rejects_path_names() {
        let repo = mem_repo();
        repo.storage().insert("/picker/x", b"x".to_vec());

        for name in ["", ".", "..", "../escape", "a/b", "a\\b"] {
            let err = repo.add(&PickedFile::new(name, "/picker/x")).unwrap_err();
            assert!(
                matches!(err, LibraryError::InvalidName { .. }),
                "expected InvalidName for {:?}",
                name
            );
        }
    }

    #[test]
    fn test_lookup_rejects_paths() {
        let repo = mem_repo();
        seed(&repo, "notes.txt", b"x");

        for id in ["", ".", "..", "../notes.txt", "sub/notes.txt", "/notes.txt", "./notes.txt"] {
            let err = repo.get(id).unwrap_err();
            assert!(
                matches!(err, LibraryError::InvalidName { .. }),
                "expected InvalidName for {:?}",
                id
            );
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_listed_backslash_name_is_usable() {
        let repo = mem_repo();
        seed(&repo, "a\\b.txt", b"hello");

        let docs = repo.list().unwrap();
        assert_eq!(docs.len(), 1);
        let id = docs[0].id.clone();
        assert_eq!(id, "a\\b.txt");

        assert_eq!(repo.get(&id).unwrap().size, 5);
        assert_eq!(repo.open(&id).unwrap().content.as_deref(), Some("hello"));
        let sharing = FakeSharing::new(true);
        repo.share(&id, &sharing).unwrap();
        repo.remove(&id).unwrap();
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_import_cancelled() {
        let repo = mem_repo();
        assert!(repo.import(&FakePicker(None)).unwrap().is_none());
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_import_adds_picked_file() {
        let repo = mem_repo();
        repo.storage().insert("/picker/photo.jpg", vec![1u8; 10]);

        let picker = FakePicker(Some(PickedFile::new("photo.jpg", "/picker/photo.jpg")));
        let doc = repo.import(&picker).unwrap().unwrap();
        assert_eq!(doc.id, "photo.jpg");
        assert_eq!(doc.kind, "jpg");
    }

    #[test]
    fn test_remove_twice_is_not_found() {
        let repo = mem_repo();
        seed(&repo, "draft.md", b"# draft");

        repo.remove("draft.md").unwrap();
        assert!(repo.list().unwrap().iter().all(|d| d.id != "draft.md"));

        let err = repo.remove("draft.md").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_get_and_open() {
        let repo = mem_repo();
        seed(&repo, "todo.md", b"- milk\n- eggs");
        seed(&repo, "image.png", &[0x89, 0x50, 0x4e, 0x47]);

        let doc = repo.open("todo.md").unwrap();
        assert_eq!(doc.content.as_deref(), Some("- milk\n- eggs"));

        let image = repo.open("image.png").unwrap();
        assert!(image.content.is_none());

        let plain = repo.get("todo.md").unwrap();
        assert!(plain.content.is_none());

        assert!(repo.get("missing.md").unwrap_err().is_not_found());
    }

    #[test]
    fn test_open_invalid_utf8_text() {
        let repo = mem_repo();
        seed(&repo, "broken.txt", &[0xff, 0xfe, 0x00]);

        let doc = repo.open("broken.txt").unwrap();
        assert!(doc.content.is_none());
    }

    #[test]
    fn test_share() {
        let repo = mem_repo();
        seed(&repo, "slides.key", b"k");

        let sharing = FakeSharing::new(true);
        repo.share("slides.key", &sharing).unwrap();
        assert_eq!(
            sharing.shared.borrow().as_slice(),
            &[repo.storage().root_path("slides.key")]
        );
    }

    #[test]
    fn test_share_missing_and_unavailable() {
        let repo = mem_repo();
        seed(&repo, "slides.key", b"k");

        let err = repo.share("nope.key", &FakeSharing::new(true)).unwrap_err();
        assert!(err.is_not_found());

        let err = repo
            .share("slides.key", &FakeSharing::new(false))
            .unwrap_err();
        assert!(matches!(err, LibraryError::SharingUnavailable));
    }

    #[test]
    fn test_clear_all() {
        let repo = mem_repo();
        seed(&repo, "a.txt", b"a");
        seed(&repo, "b.txt", b"b");
        seed(&repo, "c.txt", b"c");

        assert_eq!(repo.clear_all().unwrap(), 3);
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn test_clear_all_partial_failure_keeps_progress() {
        let repo = mem_repo();
        seed(&repo, "a.txt", b"a");
        seed(&repo, "b.txt", b"b");
        seed(&repo, "c.txt", b"c");
        repo.storage().break_entry(repo.storage().root_path("b.txt"));

        let err = repo.clear_all().unwrap_err();
        assert!(matches!(
            err,
            LibraryError::ClearIncomplete {
                removed: 2,
                failed: 1
            }
        ));
        assert_eq!(repo.storage().len(), 1);
    }

    #[test]
    fn test_store_recording() {
        let repo = mem_repo();
        repo.storage().insert("/tmp/capture-1.m4a", vec![0u8; 4096]);

        let doc = repo.store_recording(Path::new("/tmp/capture-1.m4a")).unwrap();
        assert_eq!(doc.kind, "audio");
        assert_eq!(doc.size, 4096);
        assert!(doc.name.starts_with("recording-"));
        assert!(doc.name.ends_with(".m4a"));
        assert!(!repo.storage().exists(Path::new("/tmp/capture-1.m4a")));

        // Stored entries list with their extension type
        let listed = repo.get(&doc.id).unwrap();
        assert_eq!(listed.kind, "m4a");
    }

    #[test]
    fn test_store_recording_avoids_collisions() {
        let repo = mem_repo();
        repo.storage().insert("/tmp/one.wav", vec![1u8]);
        repo.storage().insert("/tmp/two.wav", vec![2u8]);

        let first = repo.store_recording(Path::new("/tmp/one.wav")).unwrap();
        let second = repo.store_recording(Path::new("/tmp/two.wav")).unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(repo.list().unwrap().len(), 2);
    }

    #[test]
    fn test_add_file_already_in_library_keeps_contents() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("documents");
        let repo = DocumentRepository::new(FsStorage::new(&root));
        repo.storage().resolve_root().unwrap();

        let inside = root.join("report.txt");
        std::fs::write(&inside, b"important data").unwrap();

        let doc = repo.add(&PickedFile::from_path(&inside).unwrap()).unwrap();
        assert_eq!(doc.size, 14);
        assert_eq!(std::fs::read(&inside).unwrap(), b"important data");

        // Same file reached through a different spelling
        let dotted = root.join(".").join("report.txt");
        let doc = repo.add(&PickedFile::new("report.txt", dotted)).unwrap();
        assert_eq!(doc.size, 14);
        assert_eq!(repo.list().unwrap().len(), 1);
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let now = Utc::now();
        let docs = vec![
            Document::new("Annual Report.pdf", 1, now, now),
            Document::new("report-draft.docx", 1, now, now),
            Document::new("photo.jpg", 1, now, now),
        ];

        let upper = filter(&docs, "REPORT");
        let lower = filter(&docs, "report");
        assert_eq!(upper, lower);
        assert_eq!(upper.len(), 2);
        assert_eq!(filter(&docs, "").len(), 3);
        assert!(filter(&docs, "zzz").is_empty());
    }

    #[test]
    fn test_search() {
        let repo = mem_repo();
        seed(&repo, "Meeting Notes.txt", b"x");
        seed(&repo, "groceries.txt", b"y");

        let found = repo.search("meeting").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "Meeting Notes.txt");
    }

    #[test]
    fn test_fs_backed_add_remove() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("source.txt");
        std::fs::write(&source, b"hello world").unwrap();

        let repo = DocumentRepository::new(FsStorage::new(temp_dir.path().join("documents")));
        let doc = repo.add(&PickedFile::from_path(&source).unwrap()).unwrap();
        assert_eq!(doc.size, 11);

        let docs = repo.list().unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "source.txt");
        assert_eq!(
            repo.open("source.txt").unwrap().content.as_deref(),
            Some("hello world")
        );

        repo.remove("source.txt").unwrap();
        assert!(repo.remove("source.txt").unwrap_err().is_not_found());
        assert!(source.exists());
    }
}
