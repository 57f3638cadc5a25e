//! User preference stores
//!
//! Preferences are string key-value pairs. The player only persists its
//! volume, under [`SETTING_VOLUME`].
//!
//! # Example
//!
//! ```rust
//! use groove_core::{MemoryPreferences, PreferenceStore, SETTING_VOLUME};
//!
//! let mut prefs = MemoryPreferences::new();
//! prefs.set(SETTING_VOLUME, "35").unwrap();
//! assert_eq!(prefs.get(SETTING_VOLUME).unwrap().as_deref(), Some("35"));
//! ```

use crate::error::{GrooveError, Result};
use crate::traits::PreferenceStore;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Audio volume setting (0-100)
pub const SETTING_VOLUME: &str = "audio.volume";

/// Volatile preference store (tests, sessions without storage)
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: BTreeMap<String, String>,
}

impl MemoryPreferences {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with one value
    pub fn with_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut values = BTreeMap::new();
        values.insert(key.into(), value.into());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preference store persisted as a flat JSON object on disk
///
/// The whole file is rewritten on every `set`, through a temporary sibling
/// file renamed into place so a crash never leaves a truncated file.
#[derive(Debug, Clone)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFilePreferences {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is not a
    /// JSON object of strings
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                GrooveError::preferences(format!("invalid preferences file {}: {e}", path.display()))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        tracing::debug!(path = %path.display(), entries = values.len(), "Opened preferences");
        Ok(Self { path, values })
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(&self.values)?;
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist()
    }
}
