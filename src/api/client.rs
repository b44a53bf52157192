use thiserror::Error;

use crate::track::Track;

/// Cache tag invalidated after a successful like/unlike.
pub const LIKED_BY_USER_TAG: &str = "liked-by-user";

/// Session credential obtained from the auth collaborator. Implementations
/// of [`BackendApi`] attach it as a bearer token; the core never
/// authenticates, it only holds the value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
}

impl Session {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }
}

/// Failures reported by a backend implementation. None of these are fatal to
/// the core; they degrade a single view (a stale like count, an unloaded
/// queue) and are logged rather than propagated as panics.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("missing or rejected session credential")]
    Unauthorized,
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("backend returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("could not decode backend response: {0}")]
    Decode(String),
}

/// Blocking calls the core makes against the remote backend. Invoked from
/// worker threads only, never from the player actor itself, so a slow
/// network cannot stall state mutations.
///
/// Implementations hold the [`Session`] and attach its access token as the
/// bearer credential on every call; the core never sees the token flow.
pub trait BackendApi: Send + Sync {
    /// Tracks of one playlist, in playlist order.
    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ApiError>;

    /// The session user's liked tracks, up to `limit`, ordered by `sort`
    /// (backend sort expression, e.g. `-createdAt`).
    fn liked_tracks(&self, limit: usize, sort: &str) -> Result<Vec<Track>, ApiError>;

    /// Tracks of one category, up to `limit`, ordered by `sort`.
    fn category_tracks(&self, category: &str, limit: usize, sort: &str)
    -> Result<Vec<Track>, ApiError>;

    /// Like (`quantity` = 1) or unlike (`quantity` = -1) a track.
    fn submit_like(&self, track_id: &str, quantity: i8) -> Result<(), ApiError>;

    /// Invalidate a cached listing by tag, e.g. [`LIKED_BY_USER_TAG`].
    fn revalidate(&self, tag: &str) -> Result<(), ApiError>;
}
