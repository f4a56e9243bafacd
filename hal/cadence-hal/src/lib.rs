//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the two services the timing engine consumes from the
//! platform: port-addressed digital I/O and a periodic timer service.
//! Chip-specific crates implement them; the engine itself never touches
//! registers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Board firmware (cadence-firmware)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-core (key classifier, LEDs)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │ cadence-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioPort`] - Pin init, write and read by pin number
//! - [`timer::TimerService`] - Create, start and delete periodic timers

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use gpio::{Direction, GpioError, GpioPort, PinId, Polarity};
pub use timer::{TimerError, TimerMode, TimerService};
