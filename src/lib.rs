//! wavesync: the playback synchronization core of a music-streaming client.
//!
//! The crate is a headless coordination layer: it keeps a waveform widget, a
//! persistent transport bar and any number of track lists mutually consistent
//! while a single audio device plays, pauses and seeks. It owns no rendering
//! and no audio output; embedders register a live [`TransportController`] for
//! the surface that owns the real device, plus passive [`Surface`] observers
//! for everything else, and feed user intents and device events into a
//! [`Player`] handle. All state mutation serializes through one actor thread.

pub mod api;
pub mod config;
pub mod like;
pub mod player;
pub mod queue;
pub mod seek;
pub mod state;
pub mod track;
pub mod transport;

pub use api::{ApiError, BackendApi, Session};
pub use config::Settings;
pub use player::{DeviceEvent, Player, PlayerCmd};
pub use queue::{Advance, ContextKind, LoadTicket, LoopMode, PlayContext, Queue, SourceKind};
pub use seek::SeekDebouncer;
pub use state::{Origin, PlaybackState, StateHandle, StateStore};
pub use track::{Track, Uploader};
pub use transport::{DeviceCmd, Surface, TransportController};
