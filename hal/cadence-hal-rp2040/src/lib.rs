//! RP2040 backend for the Cadence timing engine
//!
//! Implements the `cadence-hal` traits on top of embassy-rp:
//!
//! - [`gpio::FlexBank`] - `GpioPort` over runtime-configurable `Flex` pins,
//!   addressed by GPIO number
//! - [`timer::TickTimer`] - `TimerService` that drives an async
//!   [`timer::TickControl`] loop; the firmware runs that loop in a task and
//!   calls the owning registry's `tick()` from it

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;

pub use gpio::{FlexBank, PIN_COUNT};
pub use timer::{TickCommand, TickControl, TickHandle, TickTimer};
