//! Ordered playback queue with shuffle/repeat semantics and supersedable
//! asynchronous loading from different backend collections.

mod context;
mod model;

pub use context::*;
pub use model::*;
