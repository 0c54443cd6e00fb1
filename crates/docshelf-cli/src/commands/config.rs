//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use docshelf_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "recorder": config.recorder,
                    "recording_format": config.recording_format,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  data_dir:         {}", config.data_dir.display());
            println!("  recorder:         {}", config.recorder);
            println!("  recording_format: {}", config.recording_format);
            println!(
                "  log_file:         {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "data_dir" => {
            if value.is_empty() {
                bail!("data_dir cannot be empty");
            }
            config.data_dir = value.into();
        }
        "recorder" => {
            if value.trim().is_empty() {
                bail!("recorder cannot be empty");
            }
            config.recorder = value.to_string();
        }
        "recording_format" => {
            let format = value.trim().trim_start_matches('.');
            if format.is_empty() || format.contains(['/', '\\']) {
                bail!("Invalid recording format: '{}'", value);
            }
            config.recording_format = format.to_string();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, recorder, recording_format, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_known_keys() {
        let mut config = Config::default();

        apply(&mut config, "recorder", "sox -d {output}").unwrap();
        assert_eq!(config.recorder, "sox -d {output}");

        apply(&mut config, "recording_format", ".flac").unwrap();
        assert_eq!(config.recording_format, "flac");

        apply(&mut config, "log_file", "/tmp/docshelf.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/docshelf.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_rejects_bad_values() {
        let mut config = Config::default();
        assert!(apply(&mut config, "recorder", "  ").is_err());
        assert!(apply(&mut config, "recording_format", "a/b").is_err());
        assert!(apply(&mut config, "sync_url", "ws://x").is_err());
    }
}
