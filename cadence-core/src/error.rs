//! Driver error types
//!
//! Every fallible operation reports to its immediate caller and leaves the
//! registry untouched on failure. Nothing is retried internally.

use cadence_hal::{GpioError, TimerError};

/// Key registry errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyError {
    /// Key was registered without an event callback
    CallbackMissing,
    /// Key table is full
    AllocationFailed,
    /// Reset called before any key was registered
    NothingRegistered,
    /// GPIO layer rejected the pin
    Gpio(GpioError),
    /// Timer service failed to create or start the scan timer
    Timer(TimerError),
}

impl From<GpioError> for KeyError {
    fn from(e: GpioError) -> Self {
        KeyError::Gpio(e)
    }
}

impl From<TimerError> for KeyError {
    fn from(e: TimerError) -> Self {
        KeyError::Timer(e)
    }
}

/// LED sequencer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Handle does not name a registered LED, or no LED is registered
    InvalidHandle,
    /// LED table or flash pool is full
    AllocationFailed,
    /// GPIO layer rejected the pin or write
    Gpio(GpioError),
    /// Timer service failed to create or start the LED timer
    Timer(TimerError),
}

impl From<GpioError> for LedError {
    fn from(e: GpioError) -> Self {
        LedError::Gpio(e)
    }
}

impl From<TimerError> for LedError {
    fn from(e: TimerError) -> Self {
        LedError::Timer(e)
    }
}
