//! Embassy async tasks
//!
//! Two tick tasks drive the engine; the controller reacts to key events.

pub mod controller;
pub mod key_tick;
pub mod led_tick;

pub use controller::{controller_task, Indicators};
pub use key_tick::key_tick_task;
pub use led_tick::led_tick_task;
