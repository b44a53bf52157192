use std::sync::{Arc, Mutex};

use crate::track::Track;

/// UI surface that authored a state mutation.
///
/// Reconciliation is gated on this tag: a surface never re-applies a change
/// it originated, which is what breaks the update cycle between independent
/// play/pause/seek sources.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Waveform-rendering track detail view.
    WaveView,
    /// Persistent mini-player transport bar.
    TransportBar,
    /// Play buttons on profile track cards.
    ProfileCard,
    /// Liked-tracks listing.
    LikeList,
    /// Playlist track listing.
    PlaylistList,
}

/// Canonical playback record observed by every surface.
#[derive(Debug, Clone, Default)]
pub struct PlaybackState {
    /// Track currently loaded, or `None` before anything played.
    pub current_track: Option<Track>,
    pub is_playing: bool,
    /// Position in seconds. Kept within `[0, duration]` when a duration is
    /// known; the media device can report transient out-of-range values.
    pub current_time: f64,
    /// Duration in seconds as reported by the device (0 until known).
    pub duration: f64,
    /// True while a seek is in flight; time updates from the device are
    /// suppressed until it clears.
    pub is_seeking: bool,
    /// One-shot "start playing once loaded" flag, consumed by the surface
    /// that loads the track into the device.
    pub auto_play: bool,
    /// Surface that last wrote this state. `None` until the first mutation.
    pub origin: Option<Origin>,
    /// Global volume, 0–100. Independent of track identity.
    pub volume: u8,
    /// Whether the current track is liked by the session user.
    pub is_liked: bool,
}

/// Cloneable read handle to the shared playback state.
pub type StateHandle = Arc<Mutex<PlaybackState>>;

/// Options for [`StateStore::set_current_track`].
#[derive(Debug, Clone, Default)]
pub struct SetTrackOptions {
    pub is_playing: bool,
    pub current_time: f64,
    pub auto_play: bool,
    pub origin: Option<Origin>,
}

/// Single-writer store over [`PlaybackState`].
///
/// All mutations clamp defensively instead of rejecting input and record the
/// origin of the write; none of them can fail.
pub struct StateStore {
    handle: StateHandle,
}

impl StateStore {
    pub fn new(volume: u8) -> Self {
        let state = PlaybackState {
            volume: volume.min(100),
            ..PlaybackState::default()
        };
        Self {
            handle: Arc::new(Mutex::new(state)),
        }
    }

    /// Clone the read handle shared with surfaces and the player handle.
    pub fn handle(&self) -> StateHandle {
        self.handle.clone()
    }

    /// Current state by value.
    pub fn snapshot(&self) -> PlaybackState {
        self.handle.lock().unwrap().clone()
    }

    /// Replace the whole playback record when switching tracks. Volume and
    /// the like flag survive; the like flag is re-resolved asynchronously by
    /// the like service afterwards.
    pub fn set_current_track(&self, track: Track, opts: SetTrackOptions) {
        let mut s = self.handle.lock().unwrap();
        s.duration = track.duration.max(0.0);
        s.current_track = Some(track);
        s.is_playing = opts.is_playing;
        s.current_time = opts.current_time.max(0.0);
        s.is_seeking = false;
        s.auto_play = opts.auto_play;
        s.origin = opts.origin;
    }

    pub fn set_playing(&self, playing: bool, origin: Origin) {
        let mut s = self.handle.lock().unwrap();
        s.is_playing = playing;
        s.origin = Some(origin);
    }

    pub fn set_current_time(&self, seconds: f64, origin: Origin) {
        let mut s = self.handle.lock().unwrap();
        let mut t = seconds.max(0.0);
        if s.duration > 0.0 {
            t = t.min(s.duration);
        }
        s.current_time = t;
        s.origin = Some(origin);
    }

    pub fn set_duration(&self, seconds: f64, origin: Origin) {
        let mut s = self.handle.lock().unwrap();
        let clamped = seconds.max(0.0);
        s.duration = clamped;
        // Mirror into the nested record so list surfaces reading the track
        // itself see the device-reported length.
        if let Some(track) = s.current_track.as_mut() {
            track.duration = clamped;
        }
        s.origin = Some(origin);
    }

    pub fn set_seeking(&self, seeking: bool, origin: Origin) {
        let mut s = self.handle.lock().unwrap();
        s.is_seeking = seeking;
        s.origin = Some(origin);
    }

    pub fn set_volume(&self, level: u8) {
        let mut s = self.handle.lock().unwrap();
        s.volume = level.min(100);
    }

    pub fn set_liked(&self, liked: bool) {
        let mut s = self.handle.lock().unwrap();
        s.is_liked = liked;
    }

    /// Adjust the current track's like counter by `delta`, floored at zero,
    /// and flip the shared flag to match the sign of the change.
    pub fn apply_like_delta(&self, delta: i8) {
        let mut s = self.handle.lock().unwrap();
        s.is_liked = delta > 0;
        if let Some(track) = s.current_track.as_mut() {
            track.count_like = (track.count_like + i64::from(delta)).max(0);
        }
    }

    /// Consume the one-shot auto-play flag. Returns the value it had.
    pub fn take_auto_play(&self) -> bool {
        let mut s = self.handle.lock().unwrap();
        std::mem::take(&mut s.auto_play)
    }

    /// Identity of the currently loaded track, if any.
    pub fn current_track_id(&self) -> Option<String> {
        let s = self.handle.lock().unwrap();
        s.current_track.as_ref().map(|t| t.id.clone())
    }
}
