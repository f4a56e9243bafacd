//! LED flash sequencer
//!
//! Each LED is either driven directly or runs a flash sequence. A sequence
//! alternates between its start level and the opposite level, counts down
//! by elapsed time or by completed cycles, then applies its end level on the
//! tick after it finishes.
//!
//! ```text
//!  set_flash ──► start level ──► opposite ──► start level ─ … ─► end level
//!                 │◄── start phase ──►│◄── rest of cycle ──►│      (next tick)
//! ```
//!
//! `set_light` during a sequence is deferred by one tick: the next tick
//! applies the requested level and releases the flash slot.

pub mod flash;
pub mod sequencer;

pub use flash::{FlashCallback, FlashConfig, FlashEdge, FlashMode, FlashPattern, FlashPool, FlashStep};
pub use sequencer::{LedHandle, LedSequencer};
