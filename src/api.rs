//! Contract with the remote backend collaborator.
//!
//! The core never performs HTTP itself; it calls through [`BackendApi`],
//! implemented by the embedding application over its HTTP/JSON stack. The
//! wire types here mirror the backend's response envelopes so implementors
//! and the core agree on shapes.

mod client;
mod types;

pub use client::*;
pub use types::*;
