//! Configuration types
//!
//! Tick periods for both registries and pin descriptions for board tables.

pub mod hardware;
pub mod timing;

pub use hardware::*;
pub use timing::*;
