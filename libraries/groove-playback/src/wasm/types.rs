//! WASM-compatible view types
//!
//! Plain serde structs handed to JavaScript through `serde-wasm-bindgen`.

use crate::preview::{PreviewVideo, QueueEntry};
use groove_core::Track;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

/// Queue panel row
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntryView {
    track: Track,
    is_current: bool,
    preview: Option<PreviewVideo>,
}

impl From<QueueEntry> for QueueEntryView {
    fn from(entry: QueueEntry) -> Self {
        Self {
            track: entry.track,
            is_current: entry.is_current,
            preview: entry.preview,
        }
    }
}

/// Serialize any view for JavaScript, falling back to `null`
pub(crate) fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Parse a track row coming from JavaScript
pub(crate) fn track_from_js(value: JsValue) -> Result<Track, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse track: {e}")))
}

/// Parse an optional play context coming from JavaScript
pub(crate) fn queue_from_js(value: JsValue) -> Result<Option<Vec<Track>>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    serde_wasm_bindgen::from_value(value)
        .map(Some)
        .map_err(|e| JsValue::from_str(&format!("Failed to parse tracks: {e}")))
}
