//! Settings store
//!
//! Owns the current `Settings` snapshot and persists it under a single key.
//! Every change writes the complete snapshot; the in-memory copy is only
//! updated once the write succeeded.

use tracing::{info, warn};

use crate::error::{Capability, LibraryError, Result};
use crate::keyvalue::KeyValueStore;
use crate::models::Settings;
use crate::platform::{AuthOutcome, Biometric};

/// Key under which the settings snapshot is stored
pub const SETTINGS_KEY: &str = "settings";

const ENABLE_LOCK_PROMPT: &str = "Authenticate to enable biometric lock";

/// Preferences persisted through a `KeyValueStore`
pub struct SettingsStore<K> {
    kv: K,
    current: Settings,
}

impl<K: KeyValueStore> SettingsStore<K> {
    /// Create a store and load the persisted snapshot
    pub fn open(kv: K) -> Self {
        let mut store = Self {
            kv,
            current: Settings::default(),
        };
        store.current = store.load();
        store
    }

    /// Current in-memory snapshot
    pub fn settings(&self) -> Settings {
        self.current
    }

    /// Read the persisted snapshot
    ///
    /// Missing or unparsable data yields the defaults; this never fails.
    pub fn load(&self) -> Settings {
        let raw = match self.kv.get(SETTINGS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                warn!("Error loading settings: {}", e);
                return Settings::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unparsable settings: {}", e);
            Settings::default()
        })
    }

    /// Persist a full snapshot and make it current
    pub fn save(&mut self, settings: &Settings) -> Result<()> {
        let persistence_error = |source: std::io::Error| LibraryError::PersistenceError {
            key: SETTINGS_KEY.to_string(),
            source,
        };

        let json = serde_json::to_string(settings).map_err(|e| persistence_error(e.into()))?;
        self.kv
            .set(SETTINGS_KEY, &json)
            .map_err(persistence_error)?;
        self.current = *settings;
        Ok(())
    }

    pub fn set_dark_mode(&mut self, enabled: bool) -> Result<Settings> {
        self.update(|s| s.dark_mode = enabled)
    }

    pub fn set_auto_backup(&mut self, enabled: bool) -> Result<Settings> {
        self.update(|s| s.auto_backup = enabled)
    }

    pub fn toggle_dark_mode(&mut self) -> Result<Settings> {
        self.update(|s| s.dark_mode = !s.dark_mode)
    }

    pub fn toggle_auto_backup(&mut self) -> Result<Settings> {
        self.update(|s| s.auto_backup = !s.auto_backup)
    }

    /// Flip the biometric lock
    ///
    /// Enabling requires a successful authentication challenge. Disabling
    /// does not.
    pub fn toggle_biometric_lock(&mut self, biometric: &dyn Biometric) -> Result<Settings> {
        if !biometric.has_hardware() {
            return Err(LibraryError::BiometricUnavailable);
        }

        if self.current.biometric_lock {
            info!("Disabling biometric lock");
            return self.update(|s| s.biometric_lock = false);
        }

        match biometric.authenticate(ENABLE_LOCK_PROMPT) {
            AuthOutcome::Success => {
                info!("Enabling biometric lock");
                self.update(|s| s.biometric_lock = true)
            }
            AuthOutcome::Failure => {
                warn!("Authentication failed, biometric lock left disabled");
                Err(LibraryError::PermissionDenied(Capability::Biometric))
            }
        }
    }

    /// Whether the biometric lock can be offered at all
    pub fn biometric_supported(&self, biometric: &dyn Biometric) -> bool {
        biometric.has_hardware()
    }

    fn update(&mut self, change: impl FnOnce(&mut Settings)) -> Result<Settings> {
        let mut next = self.current;
        change(&mut next);
        self.save(&next)?;
        Ok(next)
    }
}
