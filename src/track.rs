//! Track reference data as served by the backend.
//!
//! Tracks are owned by the backend and only referenced by the core; the
//! single exception is the like/play counters, which the like service
//! adjusts optimistically on the currently loaded record.

mod model;

pub use model::*;
