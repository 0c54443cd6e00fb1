//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use std::io::{self, Write};

use chrono::Local;
use docshelf_core::format::{format_date, format_duration, format_file_size, format_short_date};
use docshelf_core::{Document, Settings};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Print a single document, with text content when loaded
    pub fn print_document(&self, doc: &Document) {
        match self.format {
            OutputFormat::Human => {
                println!("Name:     {}", doc.name);
                println!("Type:     {}", doc.kind);
                println!("Size:     {}", format_file_size(doc.size));
                println!("Created:  {}", format_date(&doc.created_at.with_timezone(&Local)));
                println!("Modified: {}", format_date(&doc.updated_at.with_timezone(&Local)));

                if let Some(ref content) = doc.content {
                    println!();
                    println!("── Content ──");
                    println!("{}", content);
                }
            }
            OutputFormat::Json => print_json(doc),
            OutputFormat::Quiet => {
                println!("{}", doc.id);
            }
        }
    }

    /// Print a list of documents
    pub fn print_documents(&self, docs: &[Document]) {
        match self.format {
            OutputFormat::Human => {
                if docs.is_empty() {
                    println!("No documents found.");
                    return;
                }
                for doc in docs {
                    println!(
                        "{:<40} | {:<8} | {:>10} | {}",
                        truncate(&doc.name, 40),
                        truncate(&doc.kind, 8),
                        format_file_size(doc.size),
                        format_short_date(&doc.updated_at.with_timezone(&Local))
                    );
                }
                println!("\n{} document(s)", docs.len());
            }
            OutputFormat::Json => print_json(docs),
            OutputFormat::Quiet => {
                for doc in docs {
                    println!("{}", doc.id);
                }
            }
        }
    }

    /// Print the current settings
    pub fn print_settings(&self, settings: &Settings) {
        match self.format {
            OutputFormat::Human => {
                println!("Settings:");
                println!("  dark_mode:      {}", on_off(settings.dark_mode));
                println!("  biometric_lock: {}", on_off(settings.biometric_lock));
                println!("  auto_backup:    {}", on_off(settings.auto_backup));
            }
            OutputFormat::Json => print_json(settings),
            OutputFormat::Quiet => {}
        }
    }

    /// Redraw the elapsed recording time in place
    pub fn progress(&self, elapsed_secs: u64) {
        if self.format == OutputFormat::Human {
            print!("\rRecording {}  (Ctrl-C to stop)", format_duration(elapsed_secs));
            let _ = io::stdout().flush();
        }
    }

    /// End a line started by `progress`
    pub fn finish_progress(&self) {
        if self.format == OutputFormat::Human {
            println!();
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize output: {}", e),
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "on"
    } else {
        "off"
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_prompt_only_for_humans() {
        assert!(Output::new(OutputFormat::Human).should_prompt());
        assert!(!Output::new(OutputFormat::Json).should_prompt());
        assert!(!Output::new(OutputFormat::Quiet).should_prompt());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
        assert_eq!(truncate("résumé-final-draft", 9), "résumé...");
    }

    #[test]
    fn test_on_off() {
        assert_eq!(on_off(true), "on");
        assert_eq!(on_off(false), "off");
    }
}
