use serde::{Deserialize, Serialize};

/// Standard backend response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub status_code: u16,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Pagination metadata accompanying listing endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    #[serde(default)]
    pub current: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

/// One page of a listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Paginated<T> {
    #[serde(default)]
    pub meta: PageMeta,
    pub result: Vec<T>,
}

/// Body of the like/unlike mutation: `quantity` is +1 to like, -1 to unlike.
#[derive(Debug, Clone, Serialize)]
pub struct LikeRequest {
    pub track: String,
    pub quantity: i8,
}
