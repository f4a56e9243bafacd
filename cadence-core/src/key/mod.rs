//! Key press classifier
//!
//! Keys are sampled once per scan tick. Each key tracks how long its level
//! has been stable, and a small decision table turns hold durations into
//! events:
//!
//! | Event         | When                                                     |
//! |---------------|----------------------------------------------------------|
//! | `LongPress2`  | hold reaches the longer threshold (fires while held)     |
//! | `LongPress1`  | release after a hold in `[shorter, longer)` threshold    |
//! | `ShortPress`  | release after a hold in `[short_press, shorter)`         |
//!
//! Labels always follow the threshold the user assigned: `LongPress1` belongs
//! to `threshold_a_ms`, `LongPress2` to `threshold_b_ms`, whichever is larger.

pub mod classifier;
pub mod registry;
pub mod status;

pub use classifier::{classify, KeyEvent, Thresholds};
pub use registry::{KeyCallback, KeyDevice, KeyRegistry};
pub use status::KeyStatus;
