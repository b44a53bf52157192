//! Like/unlike consistency between per-track toggles and the globally
//! displayed current track.

mod service;

pub use service::*;
