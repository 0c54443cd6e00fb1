//! Platform collaborators
//!
//! Narrow interfaces for the device services the library depends on.
//! Front-ends supply implementations; tests supply fakes.

use std::io;
use std::path::{Path, PathBuf};

/// A file chosen through an import picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    /// Suggested document name (usually the source file name)
    pub name: String,
    /// Where the picked bytes can be read from
    pub location: PathBuf,
}

impl PickedFile {
    pub fn new(name: impl Into<String>, location: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Build from a path, using its file name as the document name
    pub fn from_path(path: impl Into<PathBuf>) -> Option<Self> {
        let location = path.into();
        let name = location.file_name()?.to_str()?.to_string();
        Some(Self { name, location })
    }
}

/// Presents a file picker for importing documents
pub trait DocumentPicker {
    /// Returns `None` when the user cancels
    fn pick(&self) -> io::Result<Option<PickedFile>>;
}

/// Hands stored files to other applications
pub trait Sharing {
    /// Whether the platform offers any sharing target
    fn is_available(&self) -> bool;

    fn share(&self, path: &Path) -> io::Result<()>;
}

/// Outcome of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Outcome of an authentication challenge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOutcome {
    Success,
    Failure,
}

/// Biometric (or equivalent) user authentication
pub trait Biometric {
    /// Whether the device can authenticate at all
    fn has_hardware(&self) -> bool;

    fn authenticate(&self, prompt: &str) -> AuthOutcome;
}

/// Audio quality preset for a capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePreset {
    HighQuality,
    LowQuality,
}

/// Options passed when starting a capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOptions {
    pub preset: CapturePreset,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            preset: CapturePreset::HighQuality,
        }
    }
}

/// Audio capture device
pub trait AudioCapture {
    type Handle: CaptureHandle;

    fn request_permission(&self) -> Permission;

    /// Begin capturing into a temporary artifact
    fn start(&mut self, options: &CaptureOptions) -> io::Result<Self::Handle>;
}

/// An in-progress capture
pub trait CaptureHandle {
    /// Finalize the capture and return the temporary artifact path
    fn stop(&mut self) -> io::Result<PathBuf>;

    /// Whether the device stopped on its own (e.g. the OS ended the capture)
    fn has_finished(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picked_file_from_path() {
        let picked = PickedFile::from_path("/home/me/Downloads/Report.pdf").unwrap();
        assert_eq!(picked.name, "Report.pdf");
        assert_eq!(picked.location, PathBuf::from("/home/me/Downloads/Report.pdf"));

        assert!(PickedFile::from_path("/").is_none());
    }
}
