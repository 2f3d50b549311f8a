//! Region behaviour records and the lookup collaborator that supplies them.
//!
//! Types live in the private `core` module; `source` holds the
//! [`ConfigSource`] contract and the stock implementations.

mod core;
pub mod source;

pub use self::core::{RegionConfig, StateDefinition, StateName, StateSlot};
pub use source::{ConfigSource, JsonConfigSource, MapConfigSource};
