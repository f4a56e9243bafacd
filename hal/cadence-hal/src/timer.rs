//! Timer service abstraction
//!
//! A timer created in [`TimerMode::Repeated`] fires every `period_ms` from
//! the moment it is started until it is deleted. What runs when it fires is
//! decided by whoever owns the timer: in Cadence the board glue calls the
//! owning registry's `tick()`.

/// Firing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Fire once, then stop
    Once,
    /// Fire at a fixed period until deleted
    Repeated,
}

/// Errors reported by the timer service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No timer slots left
    NoResources,
    /// Handle does not name a live timer
    InvalidHandle,
    /// Period is zero or out of range
    InvalidPeriod,
}

/// Platform timer service
pub trait TimerService {
    /// Identifies a created timer
    type Handle: Copy;

    /// Create a timer (not yet running)
    fn create(&mut self, period_ms: u32, mode: TimerMode) -> Result<Self::Handle, TimerError>;

    /// Start a created timer; the first firing is one period from now
    fn start(&mut self, handle: Self::Handle) -> Result<(), TimerError>;

    /// Stop and release a timer
    fn delete(&mut self, handle: Self::Handle) -> Result<(), TimerError>;
}

impl<T: TimerService + ?Sized> TimerService for &mut T {
    type Handle = T::Handle;

    fn create(&mut self, period_ms: u32, mode: TimerMode) -> Result<Self::Handle, TimerError> {
        (**self).create(period_ms, mode)
    }

    fn start(&mut self, handle: Self::Handle) -> Result<(), TimerError> {
        (**self).start(handle)
    }

    fn delete(&mut self, handle: Self::Handle) -> Result<(), TimerError> {
        (**self).delete(handle)
    }
}
