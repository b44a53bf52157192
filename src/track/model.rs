use serde::{Deserialize, Serialize};

/// Account that uploaded a track, as embedded in track records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Uploader {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(rename = "type", default)]
    pub account_type: String,
}

/// A single playable audio item with metadata and counters.
///
/// Field names follow the backend's camelCase JSON; `_id` is the identity
/// used everywhere the core matches tracks (queue position, like status).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub img_url: String,
    #[serde(default)]
    pub track_url: String,
    /// Total length in seconds as reported by the backend. The playback
    /// device may report a slightly different value once loaded.
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub count_like: i64,
    #[serde(default)]
    pub count_play: i64,
    #[serde(default)]
    pub uploader: Option<Uploader>,
    #[serde(default)]
    pub is_deleted: bool,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Track {
    /// Minimal track with just an identity, useful when only matching by id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}
