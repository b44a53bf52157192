//! Configuration loader and schema types.
//!
//! The schema drives playback defaults and the timing knobs of the seek
//! debouncer; loading merges an optional TOML file with environment
//! overrides.

mod load;
mod schema;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
