//! Player command and event types plus shared handles.

use std::sync::{Arc, Mutex};

use crate::like::LikeToggle;
use crate::queue::{LoadTicket, LoopMode, PlayContext, Queue, SourceKind};
use crate::state::Origin;
use crate::track::Track;
use crate::transport::{Surface, TransportController};

/// Cloneable read handle to the playback queue. The actor thread is the
/// only writer.
pub type QueueHandle = Arc<Mutex<Queue>>;

/// Native events reported by the surface that owns the real audio device.
///
/// These describe what the device actually did; the actor reconciles shared
/// state to them and never echoes a command back at the reporting device.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// The device started or resumed playing.
    Played,
    /// The device paused (user gesture, blocked autoplay, end of stream).
    Paused,
    /// Periodic position report, in seconds. Suppressed while a seek is in
    /// flight.
    TimeUpdate(f64),
    /// The device learned the real duration of the loaded media.
    DurationChanged(f64),
    /// A previously issued seek took effect.
    SeekDone,
    /// The current track played to its end.
    Ended,
}

/// Messages handled by the player actor thread.
pub enum PlayerCmd {
    /// User chose a track to play from some collection surface.
    PlayTrack {
        track: Track,
        ctx: PlayContext,
        origin: Origin,
    },
    /// Resume playback of the current track.
    Play { origin: Origin },
    /// Pause playback.
    Pause { origin: Origin },
    /// Seek the current track to an absolute position in seconds.
    SeekTo { seconds: f64, origin: Origin },
    /// Change the global volume (0–100).
    SetVolume { level: u8 },
    /// Advance to the next queue position.
    Next { origin: Origin },
    /// Step back to the previous queue position.
    Prev { origin: Origin },
    SetShuffle(bool),
    SetLoopMode(LoopMode),
    /// Like or unlike a track (optimistic, rolled back on backend failure).
    ToggleLike { track_id: String },
    /// Native event from the device-owning surface.
    DeviceEvent { origin: Origin, event: DeviceEvent },
    /// Install the live transport controller for the surface owning the
    /// real device. Replaces any previous controller.
    RegisterTransport {
        owner: Origin,
        controller: Box<dyn TransportController>,
    },
    /// Remove the live controller; ignored unless `owner` still owns it.
    UnregisterTransport { owner: Origin },
    /// Add a passive observer surface.
    RegisterSurface(Box<dyn Surface>),
    /// Internal: a queue load worker finished.
    QueueLoaded {
        ticket: LoadTicket,
        kind: SourceKind,
        source_id: Option<String>,
        tracks: Vec<Track>,
        target: String,
    },
    /// Internal: a liked-ids fetch finished.
    LikedIdsLoaded { checked: String, ids: Vec<String> },
    /// Internal: the backend answered a like mutation.
    LikeResult {
        track_id: String,
        toggle: LikeToggle,
        ok: bool,
    },
    /// Stop the actor thread.
    Quit,
}
