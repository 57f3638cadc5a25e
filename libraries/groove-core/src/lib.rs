//! Groove Core
//!
//! Platform-agnostic domain types and collaborator interfaces for the Groove
//! player.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `TrackId`, `PlaylistEntry`
//! - **Core Traits**: `CatalogProvider`, `PreferenceStore`
//! - **Play Contexts**: catalog search/filter/sort, pagination, playlist ordering
//! - **Error Handling**: Unified `GrooveError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use groove_core::{CatalogQuery, CatalogFilter, SortOption, Track};
//!
//! let tracks = vec![
//!     Track::new(1, "Blue", "Aster").with_audio_url("https://cdn/1.mp3"),
//!     Track::new(2, "Amber", "Aster").with_audio_url("https://cdn/2.mp3"),
//!     Track::new(3, "Cobalt", "Birch").with_audio_url("https://cdn/3.mp3"),
//! ];
//!
//! let query = CatalogQuery {
//!     filter: Some(CatalogFilter::Artist("Aster".to_string())),
//!     sort: SortOption::TitleAsc,
//!     ..Default::default()
//! };
//!
//! let context = query.apply(&tracks);
//! assert_eq!(context[0].title, "Amber");
//! assert_eq!(context.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod preferences;
pub mod traits;
pub mod types;

pub use catalog::{
    distinct_albums, distinct_artists, CatalogFilter, CatalogQuery, JsonCatalog, Page,
    SortOption, StaticCatalog, DEFAULT_PAGE_SIZE,
};
pub use error::{GrooveError, Result};
pub use preferences::{JsonFilePreferences, MemoryPreferences, SETTING_VOLUME};
pub use traits::{CatalogProvider, PreferenceStore};
pub use types::{playlist_queue, PlaylistEntry, Track, TrackId};
