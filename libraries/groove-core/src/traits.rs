/// Collaborator traits consumed by the playback core
use crate::error::Result;
use crate::types::Track;

/// Source of track records
///
/// Implementers yield the catalog the UI browses. The playback core never
/// mutates what a provider returns; it only builds play contexts from it.
pub trait CatalogProvider {
    /// Fetch all tracks, in the provider's natural order
    ///
    /// # Errors
    /// Returns an error if the backing catalog cannot be read
    fn tracks(&self) -> Result<Vec<Track>>;

    /// Look up a single track by id
    ///
    /// # Errors
    /// Returns an error if the backing catalog cannot be read
    fn track(&self, id: crate::types::TrackId) -> Result<Option<Track>> {
        Ok(self.tracks()?.into_iter().find(|t| t.id == id))
    }
}

/// String key-value persistence for user preferences
///
/// Only the volume preference is stored by the player, but the store is
/// keyed so other settings can share it.
pub trait PreferenceStore {
    /// Read a stored value
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    /// Returns an error if the underlying storage is unavailable
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    /// Returns an error if the underlying storage rejects the write
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<P: PreferenceStore + ?Sized> PreferenceStore for Box<P> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
