//! Data models for docshelf
//!
//! Defines the core data structures: Document and Settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Type assigned to finished recordings
pub const AUDIO_TYPE: &str = "audio";

/// Type assigned to names without an extension
pub const UNKNOWN_TYPE: &str = "unknown";

/// Extensions whose content is shown inline in document details
const TEXT_TYPES: &[&str] = &[
    "txt", "md", "markdown", "csv", "json", "log", "xml", "html", "htm", "yaml", "yml", "toml",
];

/// A stored file or recording
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Unique identifier (the stored file name)
    pub id: String,
    /// Display and storage file name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// When this document was created
    pub created_at: DateTime<Utc>,
    /// When this document was last modified
    pub updated_at: DateTime<Utc>,
    /// Lowercase extension, "audio" for recordings, or "unknown"
    #[serde(rename = "type")]
    pub kind: String,
    /// Textual payload, only loaded for detail display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Document {
    /// Create a document record for a stored entry
    pub fn new(
        name: impl Into<String>,
        size: u64,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            kind: kind_from_name(&name),
            name,
            size,
            created_at,
            updated_at,
            content: None,
        }
    }

    /// Create a record for a finished recording
    pub fn recording(name: impl Into<String>, size: u64, created_at: DateTime<Utc>) -> Self {
        let mut doc = Self::new(name, size, created_at, created_at);
        doc.kind = AUDIO_TYPE.to_string();
        doc
    }

    /// Whether the content can be shown as text
    pub fn is_text(&self) -> bool {
        TEXT_TYPES.contains(&self.kind.as_str())
    }

    /// Check whether the name contains the query, ignoring case
    ///
    /// An empty query matches every document.
    pub fn matches(&self, query: &str) -> bool {
        query.is_empty() || self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// Derive a document type from a file name
///
/// Returns the lowercase text after the last `.`, or "unknown" when there
/// is none.
pub fn kind_from_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => UNKNOWN_TYPE.to_string(),
    }
}

/// User preferences, always persisted as a complete snapshot
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub dark_mode: bool,
    #[serde(default)]
    pub biometric_lock: bool,
    #[serde(default)]
    pub auto_backup: bool,
}
