//! Device registry and shared tick source
//!
//! Each driver keeps its devices in a [`Registry`] and owns one
//! [`TickDispatch`]. The registry only grows: devices are appended and never
//! removed, so an index handed out at registration stays valid for the life
//! of the registry. Iteration visits the most recently registered device
//! first.
//!
//! The tick source is created and started on the transition from zero to one
//! device and is only ever stopped by an explicit restart, which recreates it.

use cadence_hal::{TimerError, TimerMode, TimerService};
use heapless::Vec;

/// Fixed-capacity, append-only device table
#[derive(Debug)]
pub struct Registry<R, const N: usize> {
    records: Vec<R, N>,
}

impl<R, const N: usize> Default for Registry<R, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, const N: usize> Registry<R, N> {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Number of registered devices
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no device is registered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check if another device can be registered
    pub fn has_room(&self) -> bool {
        !self.records.is_full()
    }

    /// Append a device, returning its index
    ///
    /// Returns the record back if the table is full.
    pub fn push(&mut self, record: R) -> Result<usize, R> {
        self.records.push(record)?;
        Ok(self.records.len() - 1)
    }

    /// Get a device by index
    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    /// Get a device by index for update
    pub fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.records.get_mut(index)
    }

    /// Visit devices newest first
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter().rev()
    }

    /// Visit devices newest first, for update
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut R> {
        self.records.iter_mut().rev()
    }
}

/// Lazily created periodic tick source shared by all devices of one kind
pub struct TickDispatch<T: TimerService> {
    timer: T,
    handle: Option<T::Handle>,
    period_ms: u32,
}

impl<T: TimerService> TickDispatch<T> {
    /// Wrap a timer service; nothing is created until [`Self::start_if_idle`]
    pub fn new(timer: T, period_ms: u32) -> Self {
        Self {
            timer,
            handle: None,
            period_ms,
        }
    }

    /// Tick period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.period_ms
    }

    /// Check if the repeating timer has been created and started
    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// Access the underlying timer service
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Create and start the repeating timer unless it already runs
    pub fn start_if_idle(&mut self) -> Result<(), TimerError> {
        if self.handle.is_some() {
            return Ok(());
        }
        self.handle = Some(self.spawn()?);
        info!("tick source started, period {} ms", self.period_ms);
        Ok(())
    }

    /// Delete the running timer and start a fresh one from zero
    pub fn restart(&mut self) -> Result<(), TimerError> {
        if let Some(handle) = self.handle {
            self.timer.delete(handle)?;
            self.handle = None;
        }
        self.handle = Some(self.spawn()?);
        info!("tick source restarted, period {} ms", self.period_ms);
        Ok(())
    }

    fn spawn(&mut self) -> Result<T::Handle, TimerError> {
        let handle = self.timer.create(self.period_ms, TimerMode::Repeated)?;
        if let Err(e) = self.timer.start(handle) {
            // Don't leak a created-but-idle timer
            let _ = self.timer.delete(handle);
            return Err(e);
        }
        Ok(handle)
    }
}
