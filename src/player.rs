//! The serialized entry point for all playback coordination.
//!
//! [`Player`] is a cloneable-handle facade over one actor thread that owns
//! the state store, the queue, the seek debouncer and the like service.
//! Surfaces send user intents and device events as [`PlayerCmd`] messages;
//! backend calls run on worker threads that post their completions back into
//! the same channel, so every mutation happens on one logical timeline.

mod handle;
mod thread;
mod types;

pub use handle::*;
pub use types::*;

#[cfg(test)]
mod tests;
