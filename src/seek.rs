//! Debounced seeking: coalesces a burst of seek intents (slider drags) into
//! a single device seek, then holds a grace window during which the device's
//! own time updates are still suppressed.

mod debounce;

pub use debounce::*;
