//! Timer service backed by an embassy-time `Ticker`
//!
//! [`TickTimer`] is the synchronous half handed to a registry: `create`,
//! `start` and `delete` only post a [`TickCommand`]. [`TickControl::run`] is
//! the async half, running in a firmware task and calling the tick callback
//! at the commanded period.

use cadence_hal::{TimerError, TimerMode, TimerService};
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

/// Command posted to a tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickCommand {
    /// (Re)start ticking from now
    Start { period_ms: u32, repeat: bool },
    /// Stop ticking
    Stop,
}

/// Shared between a [`TickTimer`] and the task running the tick loop
pub struct TickControl {
    signal: Signal<CriticalSectionRawMutex, TickCommand>,
}

impl Default for TickControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TickControl {
    pub const fn new() -> Self {
        Self {
            signal: Signal::new(),
        }
    }

    /// Post a command; a newer command replaces one not yet seen
    pub fn command(&self, command: TickCommand) {
        self.signal.signal(command);
    }

    /// Run the tick loop forever
    ///
    /// Idle until started. Each `Start` restarts the ticker from zero.
    pub async fn run(&self, mut on_tick: impl FnMut()) -> ! {
        let mut active: Option<(u32, bool)> = None;

        loop {
            let Some((period_ms, repeat)) = active else {
                if let TickCommand::Start { period_ms, repeat } = self.signal.wait().await {
                    active = Some((period_ms, repeat));
                }
                continue;
            };

            let mut ticker = Ticker::every(Duration::from_millis(u64::from(period_ms)));
            active = loop {
                match select(ticker.next(), self.signal.wait()).await {
                    Either::First(()) => {
                        on_tick();
                        if !repeat {
                            break None;
                        }
                    }
                    Either::Second(TickCommand::Start { period_ms, repeat }) => {
                        break Some((period_ms, repeat));
                    }
                    Either::Second(TickCommand::Stop) => break None,
                }
            };
        }
    }
}

/// Handle issued by [`TickTimer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickHandle(u8);

#[derive(Clone, Copy)]
struct Slot {
    handle: TickHandle,
    period_ms: u32,
    repeat: bool,
}

/// Single-timer service driving one [`TickControl`]
pub struct TickTimer<'a> {
    control: &'a TickControl,
    slot: Option<Slot>,
    next_id: u8,
}

impl<'a> TickTimer<'a> {
    pub const fn new(control: &'a TickControl) -> Self {
        Self {
            control,
            slot: None,
            next_id: 0,
        }
    }

    fn live(&self, handle: TickHandle) -> Result<Slot, TimerError> {
        match self.slot {
            Some(slot) if slot.handle == handle => Ok(slot),
            _ => Err(TimerError::InvalidHandle),
        }
    }
}

impl TimerService for TickTimer<'_> {
    type Handle = TickHandle;

    fn create(&mut self, period_ms: u32, mode: TimerMode) -> Result<TickHandle, TimerError> {
        if period_ms == 0 {
            return Err(TimerError::InvalidPeriod);
        }
        if self.slot.is_some() {
            return Err(TimerError::NoResources);
        }

        let handle = TickHandle(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slot = Some(Slot {
            handle,
            period_ms,
            repeat: mode == TimerMode::Repeated,
        });
        Ok(handle)
    }

    fn start(&mut self, handle: TickHandle) -> Result<(), TimerError> {
        let slot = self.live(handle)?;
        self.control.command(TickCommand::Start {
            period_ms: slot.period_ms,
            repeat: slot.repeat,
        });
        Ok(())
    }

    fn delete(&mut self, handle: TickHandle) -> Result<(), TimerError> {
        self.live(handle)?;
        self.slot = None;
        self.control.command(TickCommand::Stop);
        Ok(())
    }
}
