//! Browser-backed collaborators: `localStorage` preferences and the
//! reduced-motion media query

use crate::preview::ReducedMotionSignal;
use groove_core::{GrooveError, PreferenceStore};
use web_sys::Storage;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Preference store over `window.localStorage`
///
/// When storage is unavailable (privacy mode, sandboxed frame) reads return
/// nothing and writes fail.
pub struct LocalStoragePreferences {
    storage: Option<Storage>,
}

impl LocalStoragePreferences {
    /// Bind to the window's local storage
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        Self { storage }
    }

    /// Whether storage was available
    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }
}

impl Default for LocalStoragePreferences {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStoragePreferences {
    fn get(&self, key: &str) -> groove_core::Result<Option<String>> {
        match &self.storage {
            Some(storage) => storage
                .get_item(key)
                .map_err(|e| GrooveError::preferences(format!("localStorage read failed: {e:?}"))),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> groove_core::Result<()> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| GrooveError::preferences("localStorage unavailable"))?;
        storage
            .set_item(key, value)
            .map_err(|e| GrooveError::preferences(format!("localStorage write failed: {e:?}")))
    }
}

/// Reduced-motion signal read from `matchMedia`
///
/// Queried on every call so a changed OS setting applies to the next render.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaQueryMotion;

impl ReducedMotionSignal for MediaQueryMotion {
    fn prefers_reduced_motion(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.match_media(REDUCED_MOTION_QUERY).ok().flatten())
            .is_some_and(|query| query.matches())
    }
}
