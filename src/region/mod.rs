//! Per-tile interaction state machine.
//!
//! Implementation details live in the private `core` module.

mod core;

pub use self::core::{EventFlow, InteractionState, ManagedRegion, RegionStates};
