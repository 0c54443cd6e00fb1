//! Settings command handlers

use anyhow::Result;
use clap::ValueEnum;

use docshelf_core::{Biometric, Library};

use crate::output::Output;
use crate::platform::PromptAuthenticator;

/// Settings that can be flipped from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SettingKey {
    DarkMode,
    BiometricLock,
    AutoBackup,
}

/// Show current settings
pub fn show(library: &Library, output: &Output) -> Result<()> {
    output.print_settings(&library.settings().settings());
    if !library.settings().biometric_supported(&PromptAuthenticator) {
        output.message("Biometric lock needs an interactive terminal.");
    }
    Ok(())
}

/// Flip one setting and persist the result
pub fn toggle(library: &mut Library, key: SettingKey, output: &Output) -> Result<()> {
    toggle_with(library, key, &PromptAuthenticator, output)
}

fn toggle_with(
    library: &mut Library,
    key: SettingKey,
    biometric: &dyn Biometric,
    output: &Output,
) -> Result<()> {
    let store = library.settings_mut();
    let updated = match key {
        SettingKey::DarkMode => store.toggle_dark_mode()?,
        SettingKey::AutoBackup => store.toggle_auto_backup()?,
        SettingKey::BiometricLock => store.toggle_biometric_lock(biometric)?,
    };

    output.success("Settings saved");
    output.print_settings(&updated);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use docshelf_core::{AuthOutcome, Config, LibraryError};
    use tempfile::TempDir;

    struct NoHardware;

    impl Biometric for NoHardware {
        fn has_hardware(&self) -> bool {
            false
        }

        fn authenticate(&self, _prompt: &str) -> AuthOutcome {
            AuthOutcome::Failure
        }
    }

    fn test_library(temp_dir: &TempDir) -> Library {
        Library::open_with_config(Config {
            data_dir: temp_dir.path().to_path_buf(),
            recorder: "true {output}".to_string(),
            recording_format: "wav".to_string(),
            log_file: None,
        })
    }

    #[test]
    fn test_toggle_dark_mode() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = test_library(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        toggle(&mut library, SettingKey::DarkMode, &output).unwrap();
        assert!(library.settings().settings().dark_mode);

        toggle(&mut library, SettingKey::DarkMode, &output).unwrap();
        assert!(!library.settings().settings().dark_mode);
    }

    #[test]
    fn test_biometric_lock_without_hardware() {
        let temp_dir = TempDir::new().unwrap();
        let mut library = test_library(&temp_dir);
        let output = Output::new(OutputFormat::Quiet);

        let err = toggle_with(&mut library, SettingKey::BiometricLock, &NoHardware, &output)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LibraryError>(),
            Some(LibraryError::BiometricUnavailable)
        ));
        assert!(!library.settings().settings().biometric_lock);
    }
}
