//! Library error handling
//!
//! Provides typed errors for repository, settings and recording operations
//! with descriptive messages and recovery suggestions.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// A device capability that must be granted before use
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Microphone,
    Biometric,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Microphone => write!(f, "microphone"),
            Capability::Biometric => write!(f, "biometric authentication"),
        }
    }
}

/// Errors that can occur during library operations
#[derive(Error, Debug)]
pub enum LibraryError {
    /// The storage root cannot be resolved or read
    #[error("Document storage is not available: {reason}")]
    StorageUnavailable { reason: String },

    /// The operation targets a document that does not exist
    #[error("Document not found: '{id}'")]
    NotFound { id: String },

    /// A capability was refused by the user or the platform
    #[error("Permission denied: {0} access was not granted")]
    PermissionDenied(Capability),

    /// No way to hand files to other applications
    #[error("Sharing is not available on this device")]
    SharingUnavailable,

    /// No biometric hardware present
    #[error("Biometric authentication is not available on this device")]
    BiometricUnavailable,

    /// Settings could not be written
    #[error("Failed to save '{key}': {source}")]
    PersistenceError {
        key: String,
        #[source]
        source: io::Error,
    },

    /// A recording is already in progress
    #[error("A recording is already in progress")]
    AlreadyRecording,

    /// Document names are plain file names
    #[error("Invalid document name: '{name}'")]
    InvalidName { name: String },

    /// Some entries survived a delete-all
    #[error("Cleared {removed} document(s), but {failed} could not be deleted")]
    ClearIncomplete { removed: usize, failed: usize },

    /// The import picker failed
    #[error("Document picker failed: {0}")]
    Picker(#[source] io::Error),

    /// The audio capture device reported a failure
    #[error("Audio capture failed: {0}")]
    Capture(String),

    /// A finished capture could not be moved into the library
    #[error("Recording could not be stored; capture kept at '{artifact}': {source}")]
    RecordingNotStored {
        artifact: PathBuf,
        #[source]
        source: Box<LibraryError>,
    },

    /// Generic I/O error with path context
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LibraryError {
    /// Create an error from an I/O error on a document
    ///
    /// A missing file becomes `NotFound` for the given document id.
    pub fn from_io(error: io::Error, id: &str, path: PathBuf) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => LibraryError::NotFound { id: id.to_string() },
            _ => LibraryError::Io {
                path,
                source: error,
            },
        }
    }

    /// Check if this error is a missing document
    pub fn is_not_found(&self) -> bool {
        matches!(self, LibraryError::NotFound { .. })
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            LibraryError::StorageUnavailable { .. } => {
                Some("Check that the data directory exists and is writable, or set DOCSHELF_DATA_DIR.")
            }
            LibraryError::PermissionDenied(Capability::Microphone) => {
                Some("Grant microphone access, or configure a recorder program that is installed.")
            }
            LibraryError::PermissionDenied(Capability::Biometric) => {
                Some("Authentication did not succeed. The setting was left unchanged.")
            }
            LibraryError::PersistenceError { .. } => {
                Some("Check file permissions and free disk space, then try again.")
            }
            LibraryError::AlreadyRecording => Some("Stop the current recording first."),
            LibraryError::ClearIncomplete { .. } => {
                Some("Run the command again to retry the remaining documents.")
            }
            LibraryError::RecordingNotStored { .. } => {
                Some("The capture file was kept. Import it with `docshelf add` once storage is available.")
            }
            _ => None,
        }
    }
}

/// Result type for library operations
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = LibraryError::from_io(io_err, "report.pdf", PathBuf::from("/docs/report.pdf"));

        assert!(err.is_not_found());
        assert!(err.to_string().contains("report.pdf"));
    }

    #[test]
    fn test_other_io_classification() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = LibraryError::from_io(io_err, "a.txt", PathBuf::from("/docs/a.txt"));

        assert!(matches!(err, LibraryError::Io { .. }));
        assert!(err.to_string().contains("/docs/a.txt"));
    }

    #[test]
    fn test_permission_display() {
        let err = LibraryError::PermissionDenied(Capability::Microphone);
        assert!(err.to_string().contains("microphone"));
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_recording_not_stored_names_capture() {
        let err = LibraryError::RecordingNotStored {
            artifact: PathBuf::from("/tmp/capture-1.m4a"),
            source: Box::new(LibraryError::StorageUnavailable {
                reason: "offline".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/capture-1.m4a"));
        assert!(msg.contains("offline"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.recovery_suggestion().is_some());
    }

    #[test]
    fn test_clear_incomplete_display() {
        let err = LibraryError::ClearIncomplete {
            removed: 3,
            failed: 1,
        };
        let msg = err.to_string();
        assert!(msg.contains("3"));
        assert!(msg.contains("1 could not"));
    }
}
