//! docshelf Core Library
//!
//! This crate provides the core functionality for docshelf, a local
//! library of imported documents and recorded voice notes.
//!
//! # Architecture
//!
//! Every device service (file storage, import picker, sharing, audio
//! capture, biometric authentication, key-value persistence) sits behind a
//! trait, so the same repository and settings logic runs against the real
//! filesystem or against in-memory stand-ins.
//!
//! Document records are derived from storage on every listing; nothing is
//! cached.
//!
//! # Quick Start
//!
//! ```text
//! let mut library = Library::open()?;
//!
//! // Import a file
//! let picked = PickedFile::from_path("/home/me/report.pdf").unwrap();
//! library.documents().add(&picked)?;
//!
//! // Query documents
//! let docs = library.documents().search("report")?;
//! ```
//!
//! # Modules
//!
//! - `library`: Unified interface (main entry point)
//! - `repository`: Document listing, import, removal, sharing
//! - `settings`: Persisted preferences
//! - `recording`: Audio recording state machine
//! - `storage`: Storage trait with filesystem and in-memory backends
//! - `keyvalue`: Key-value persistence for settings
//! - `platform`: Device service traits
//! - `models`: Document and Settings records
//! - `format`: Display helpers
//! - `config`: Application configuration

pub mod config;
pub mod error;
pub mod format;
pub mod keyvalue;
pub mod library;
pub mod models;
pub mod platform;
pub mod recording;
pub mod repository;
pub mod settings;
pub mod storage;

pub use config::Config;
pub use error::{Capability, LibraryError, Result};
pub use keyvalue::{FileKeyValueStore, KeyValueStore, MemKeyValueStore};
pub use library::Library;
pub use models::{Document, Settings};
pub use platform::{
    AudioCapture, AuthOutcome, Biometric, CaptureHandle, CaptureOptions, DocumentPicker,
    Permission, PickedFile, Sharing,
};
pub use recording::{RecordingSession, SessionEvent, SessionState};
pub use repository::{filter, DocumentRepository};
pub use settings::SettingsStore;
pub use storage::{FsStorage, MemStorage, Storage};
