//! The contract between the shared state layer and the UI surfaces.
//!
//! Exactly one surface owns the real audio device at a time and registers a
//! [`TransportController`] for it; every other surface registers a passive
//! [`Surface`] observer and never commands real audio. Origin arbitration
//! lives here: [`should_apply`] gates observer reconciliation and
//! [`device_commands`] derives the minimal set of device calls for a state
//! transition.

mod sync;

pub use sync::*;
