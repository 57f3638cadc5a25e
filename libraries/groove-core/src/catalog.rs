//! Catalog providers and play-context builders
//!
//! The browse view hands `play_now` the *whole* filtered and sorted list, not
//! just the visible page, so next/previous walk the same order the user sees.

use crate::error::{GrooveError, Result};
use crate::traits::CatalogProvider;
use crate::types::Track;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Default number of tracks per catalog page
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// In-memory catalog
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
}

impl StaticCatalog {
    /// Create a catalog over the given tracks (order preserved)
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Parse a JSON array of backend rows
    pub fn from_json_str(json: &str) -> Result<Self> {
        let tracks: Vec<Track> = serde_json::from_str(json)?;
        Ok(Self::new(tracks))
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl CatalogProvider for StaticCatalog {
    fn tracks(&self) -> Result<Vec<Track>> {
        Ok(self.tracks.clone())
    }
}

/// Catalog backed by a JSON file of backend rows, re-read on every fetch
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    path: PathBuf,
}

impl JsonCatalog {
    /// Create a provider for the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogProvider for JsonCatalog {
    fn tracks(&self) -> Result<Vec<Track>> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| {
            GrooveError::catalog(format!("failed to read {}: {e}", self.path.display()))
        })?;
        let tracks: Vec<Track> = serde_json::from_str(&raw).map_err(|e| {
            GrooveError::catalog(format!("failed to parse {}: {e}", self.path.display()))
        })?;
        tracing::debug!(path = %self.path.display(), count = tracks.len(), "Loaded catalog");
        Ok(tracks)
    }
}

/// Narrow the catalog to one artist or one album
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CatalogFilter {
    /// Exact artist match
    Artist(String),

    /// Exact album match
    Album(String),
}

impl CatalogFilter {
    fn matches(&self, track: &Track) -> bool {
        match self {
            CatalogFilter::Artist(artist) => track.artist == *artist,
            CatalogFilter::Album(album) => track.album.as_deref() == Some(album.as_str()),
        }
    }
}

/// Catalog sort order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    /// Title A-Z
    #[default]
    TitleAsc,

    /// Title Z-A
    TitleDesc,

    /// Artist A-Z
    ArtistAsc,

    /// Artist Z-A
    ArtistDesc,
}

impl SortOption {
    fn compare(self, a: &Track, b: &Track) -> Ordering {
        match self {
            SortOption::TitleAsc => compare_text(&a.title, &b.title),
            SortOption::TitleDesc => compare_text(&b.title, &a.title),
            SortOption::ArtistAsc => compare_text(&a.artist, &b.artist),
            SortOption::ArtistDesc => compare_text(&b.artist, &a.artist),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            SortOption::TitleAsc => "title-asc",
            SortOption::TitleDesc => "title-desc",
            SortOption::ArtistAsc => "artist-asc",
            SortOption::ArtistDesc => "artist-desc",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = GrooveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "title-asc" => Ok(SortOption::TitleAsc),
            "title-desc" => Ok(SortOption::TitleDesc),
            "artist-asc" => Ok(SortOption::ArtistAsc),
            "artist-desc" => Ok(SortOption::ArtistDesc),
            other => Err(GrooveError::invalid_input(format!(
                "unknown sort option '{other}' (use title-asc, title-desc, artist-asc, artist-desc)"
            ))),
        }
    }
}

/// Case-insensitive ordering with a byte-order tiebreak so sorting is total
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Search, filter, and sort settings of the browse view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogQuery {
    /// Free-text search over title and artist
    #[serde(default)]
    pub search: String,

    /// Optional artist/album filter
    #[serde(default)]
    pub filter: Option<CatalogFilter>,

    /// Sort order
    #[serde(default)]
    pub sort: SortOption,
}

impl CatalogQuery {
    /// Check whether a single track passes search and filter
    pub fn matches(&self, track: &Track) -> bool {
        let needle = self.search.trim().to_lowercase();
        let matches_search = needle.is_empty()
            || track.title.to_lowercase().contains(&needle)
            || track.artist.to_lowercase().contains(&needle);
        let matches_filter = self.filter.as_ref().map_or(true, |f| f.matches(track));
        matches_search && matches_filter
    }

    /// Produce the ordered play context for this query
    pub fn apply(&self, tracks: &[Track]) -> Vec<Track> {
        let mut result: Vec<Track> = tracks
            .iter()
            .filter(|track| self.matches(track))
            .cloned()
            .collect();
        // sort_by is stable: equal keys keep catalog order
        result.sort_by(|a, b| self.sort.compare(a, b));
        result
    }
}

/// One page of a longer list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,

    /// 1-based page number
    pub page: usize,

    /// Page size used
    pub per_page: usize,

    /// Items across all pages
    pub total_items: usize,

    /// Number of pages (0 for an empty list)
    pub total_pages: usize,
}

impl<T: Clone> Page<T> {
    /// Slice `items` into the requested 1-based page
    ///
    /// Page 0 is treated as page 1; pages past the end are empty.
    pub fn of(items: &[T], page: usize, per_page: usize) -> Self {
        let per_page = per_page.max(1);
        let page = page.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(per_page);
        let start = (page - 1).saturating_mul(per_page).min(total_items);
        let end = start.saturating_add(per_page).min(total_items);

        Self {
            items: items[start..end].to_vec(),
            page,
            per_page,
            total_items,
            total_pages,
        }
    }
}

/// Distinct artists in first-seen order
pub fn distinct_artists(tracks: &[Track]) -> Vec<String> {
    let mut seen = Vec::new();
    for track in tracks {
        if !seen.contains(&track.artist) {
            seen.push(track.artist.clone());
        }
    }
    seen
}

/// Distinct non-blank albums in first-seen order
pub fn distinct_albums(tracks: &[Track]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for album in tracks.iter().filter_map(|t| t.album.as_deref()) {
        if !album.trim().is_empty() && !seen.iter().any(|a| a == album) {
            seen.push(album.to_string());
        }
    }
    seen
}
