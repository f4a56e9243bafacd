//! Board-agnostic timing engine for key and LED peripherals
//!
//! Both drivers share one pattern: a registry of per-device records that a
//! fixed-period tick walks once per period, each record advancing its own
//! small timing state machine.
//!
//! - [`key::KeyRegistry`] - samples keys every tick and classifies holds into
//!   short press, long press 1 and long press 2
//! - [`led::LedSequencer`] - drives LEDs directly or through timed flash
//!   sequences that end in a chosen light state
//! - [`registry`] - the shared device table and lazily started tick source
//! - [`config`] - tick periods and board pin descriptions
//!
//! Hardware access goes through the `cadence-hal` traits so the whole crate
//! runs on the host under test.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod error;
pub mod key;
pub mod led;
pub mod registry;

#[cfg(test)]
pub(crate) mod mock;

pub use config::{PinConfig, TimingConfig};
pub use error::{KeyError, LedError};
pub use key::{KeyCallback, KeyDevice, KeyEvent, KeyRegistry, KeyStatus};
pub use led::{FlashCallback, FlashEdge, FlashMode, FlashPattern, LedHandle, LedSequencer};
