//! Shared playback state: the single source of truth for "what is playing,
//! where, and who last touched it".
//!
//! The store wraps an `Arc<Mutex<PlaybackState>>` handle. Exactly one writer
//! (the player actor thread) goes through the mutation methods; every other
//! thread clones the handle and reads snapshots.

mod model;

pub use model::*;
