//! Unified library interface
//!
//! The `Library` ties together the configured document directory and the
//! settings file:
//! - `DocumentRepository` over `FsStorage` at `<data_dir>/documents`
//! - `SettingsStore` over `FileKeyValueStore` at `<data_dir>/settings.json`
//!
//! ## Usage
//!
//! ```ignore
//! let mut library = Library::open()?;
//!
//! let doc = library.documents().add(&PickedFile::from_path("notes.txt").unwrap())?;
//! let found = library.documents().search("notes")?;
//! library.settings_mut().toggle_dark_mode()?;
//! ```

use anyhow::{Context, Result};

use crate::config::Config;
use crate::keyvalue::FileKeyValueStore;
use crate::platform::AudioCapture;
use crate::recording::RecordingSession;
use crate::repository::DocumentRepository;
use crate::settings::SettingsStore;
use crate::storage::FsStorage;

/// Documents and settings for one data directory
pub struct Library {
    documents: DocumentRepository<FsStorage>,
    settings: SettingsStore<FileKeyValueStore>,
    config: Config,
}

impl Library {
    /// Open the library using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Ok(Self::open_with_config(config))
    }

    /// Open the library with a specific configuration
    pub fn open_with_config(config: Config) -> Self {
        let documents = DocumentRepository::new(FsStorage::new(config.documents_dir()));
        let settings = SettingsStore::open(FileKeyValueStore::new(config.settings_path()));
        Self {
            documents,
            settings,
            config,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn documents(&self) -> &DocumentRepository<FsStorage> {
        &self.documents
    }

    pub fn settings(&self) -> &SettingsStore<FileKeyValueStore> {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SettingsStore<FileKeyValueStore> {
        &mut self.settings
    }

    /// Start a recording session that stores into this library
    pub fn recording_session<A: AudioCapture>(
        &self,
        capture: A,
    ) -> RecordingSession<'_, FsStorage, A> {
        RecordingSession::new(&self.documents, capture)
    }
}
