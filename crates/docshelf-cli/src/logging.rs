//! Diagnostic logging setup
//!
//! Logging is off unless `DOCSHELF_LOG` is set to a level (e.g. `debug`).
//! Output goes to the configured log file, or stderr when none is set.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use docshelf_core::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log level
const LOG_ENV: &str = "DOCSHELF_LOG";

pub fn init_logging(config: &Config) {
    let Ok(log_level) = std::env::var(LOG_ENV) else {
        return;
    };

    let env_filter = filter_for(&log_level);

    match config.log_file.as_deref() {
        Some(path) => {
            let Some(log_file) = open_log_file(path) else {
                return;
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(log_file))
                .try_init();
            info!("Logging initialized to {:?}", path);
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("docshelf_core={},docshelf_cli={}", level, level))
}

fn open_log_file(path: &Path) -> Option<std::fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            let _ = std::fs::create_dir_all(parent);
        }
    }
    match OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => Some(f),
        Err(e) => {
            eprintln!("Warning: Could not open log file {:?}: {}", path, e);
            None
        }
    }
}
