use crate::state::{PlaybackState, StateStore};

/// An optimistic toggle that has been applied locally but not yet confirmed
/// by the backend. Holds what is needed to undo it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LikeToggle {
    /// +1 when the toggle liked the track, -1 when it unliked.
    pub quantity: i8,
}

/// Keeps "is this track liked" consistent across every surface rendering a
/// like button, including the shared current-track record.
///
/// The current track's flag lives in [`PlaybackState::is_liked`]; any other
/// track is resolved against the locally fetched list of liked ids. Toggles
/// are optimistic and rolled back when the backend mutation fails.
#[derive(Debug, Default)]
pub struct LikeSyncService {
    liked_ids: Vec<String>,
}

impl LikeSyncService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the locally known liked-track ids (result of a likes fetch).
    pub fn set_liked_ids(&mut self, ids: Vec<String>) {
        self.liked_ids = ids;
    }

    pub fn liked_ids(&self) -> &[String] {
        &self.liked_ids
    }

    /// Liked status of `track_id`: the shared flag for the current track,
    /// the local list for everything else.
    pub fn is_liked(&self, track_id: &str, state: &PlaybackState) -> bool {
        match state.current_track.as_ref() {
            Some(track) if track.id == track_id => state.is_liked,
            _ => self.contains(track_id),
        }
    }

    /// Optimistically flip the liked state of `track_id`, adjusting the
    /// shared record when it is the current track. Returns the toggle to
    /// submit to the backend (and to undo on failure).
    pub fn toggle(&mut self, store: &StateStore, track_id: &str) -> LikeToggle {
        let was_liked = self.is_liked(track_id, &store.snapshot());
        let quantity: i8 = if was_liked { -1 } else { 1 };

        self.set_membership(track_id, !was_liked);
        if store.current_track_id().as_deref() == Some(track_id) {
            store.apply_like_delta(quantity);
        }

        LikeToggle { quantity }
    }

    /// Undo an optimistic toggle after the backend rejected it.
    pub fn rollback(&mut self, store: &StateStore, track_id: &str, toggle: LikeToggle) {
        self.set_membership(track_id, toggle.quantity < 0);
        if store.current_track_id().as_deref() == Some(track_id) {
            store.apply_like_delta(-toggle.quantity);
        }
    }

    fn contains(&self, track_id: &str) -> bool {
        self.liked_ids.iter().any(|id| id == track_id)
    }

    fn set_membership(&mut self, track_id: &str, liked: bool) {
        if liked {
            if !self.contains(track_id) {
                self.liked_ids.push(track_id.to_string());
            }
        } else {
            self.liked_ids.retain(|id| id != track_id);
        }
    }
}
