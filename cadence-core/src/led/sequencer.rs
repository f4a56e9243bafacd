//! LED registry and tick processing

use cadence_hal::{Direction, GpioError, GpioPort, PinId, Polarity, TimerService};

use super::flash::{FlashCallback, FlashConfig, FlashPattern, FlashPool};
use crate::config::{PinConfig, TimingConfig};
use crate::error::LedError;
use crate::registry::{Registry, TickDispatch};

/// Handle to a registered LED
///
/// Valid for the life of the sequencer that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedHandle(usize);

impl LedHandle {
    /// Position in registration order
    pub const fn index(self) -> usize {
        self.0
    }
}

struct LedRecord {
    pin: PinId,
    polarity: Polarity,
    /// Flash pool slot while a sequence is active
    flash: Option<usize>,
    stop_pending: bool,
    stop_level: bool,
    /// Last logical level driven
    lit: bool,
}

impl LedRecord {
    fn drive<G: GpioPort>(&mut self, gpio: &mut G, on: bool) -> Result<(), GpioError> {
        gpio.write(self.pin, self.polarity.to_physical(on))?;
        self.lit = on;
        Ok(())
    }
}

/// LED flash sequencer
///
/// - `G`: GPIO port driving the LEDs
/// - `T`: timer service providing the LED tick
/// - `E`: end-of-sequence callback type
/// - `N`: maximum number of LEDs
/// - `F`: maximum number of simultaneously active flash sequences
pub struct LedSequencer<G, T, E, const N: usize, const F: usize>
where
    G: GpioPort,
    T: TimerService,
    E: FlashCallback,
{
    gpio: G,
    dispatch: TickDispatch<T>,
    leds: Registry<LedRecord, N>,
    pool: FlashPool<E, F>,
}

impl<G, T, E, const N: usize, const F: usize> LedSequencer<G, T, E, N, F>
where
    G: GpioPort,
    T: TimerService,
    E: FlashCallback,
{
    /// Create an empty sequencer with default timing
    pub fn new(gpio: G, timer: T) -> Self {
        Self::with_timing(gpio, timer, &TimingConfig::default())
    }

    /// Create an empty sequencer with custom timing
    pub fn with_timing(gpio: G, timer: T, timing: &TimingConfig) -> Self {
        Self {
            gpio,
            dispatch: TickDispatch::new(timer, timing.led_period()),
            leds: Registry::new(),
            pool: FlashPool::new(),
        }
    }

    /// Register an LED, initially off
    ///
    /// The first LED creates and starts the LED timer.
    pub fn create_handle(&mut self, pin: PinId, active_low: bool) -> Result<LedHandle, LedError> {
        if !self.leds.has_room() {
            return Err(LedError::AllocationFailed);
        }

        self.gpio.init(pin, Direction::Output, active_low)?;
        self.dispatch.start_if_idle()?;

        let record = LedRecord {
            pin,
            polarity: Polarity::from_active_low(active_low),
            flash: None,
            stop_pending: false,
            stop_level: false,
            lit: false,
        };
        let index = self
            .leds
            .push(record)
            .map_err(|_| LedError::AllocationFailed)?;

        debug!("led registered on pin {}", pin);
        Ok(LedHandle(index))
    }

    /// Register an LED described by a board pin entry
    pub fn create_from(&mut self, pin: PinConfig) -> Result<LedHandle, LedError> {
        self.create_handle(pin.pin, pin.active_low)
    }

    /// Re-initialize every LED output and restart the LED timer from zero
    ///
    /// Active sequences keep their state and drive the pin again on their
    /// next phase change. A pin that fails to re-initialize keeps its last
    /// level; the remaining LEDs and the timer are still reset and the first
    /// error is returned.
    pub fn reset(&mut self) -> Result<(), LedError> {
        if self.leds.is_empty() {
            return Err(LedError::InvalidHandle);
        }

        let mut result = Ok(());
        for led in self.leds.iter_mut() {
            match self
                .gpio
                .init(led.pin, Direction::Output, led.polarity.is_active_low())
            {
                Ok(()) => led.lit = false,
                Err(e) => {
                    warn!("led pin {} re-init failed: {}", led.pin, e);
                    if result.is_ok() {
                        result = Err(LedError::from(e));
                    }
                }
            }
        }

        let restarted = self.dispatch.restart().map_err(LedError::from);
        result.and(restarted)
    }

    /// Turn an LED on or off
    ///
    /// While a sequence runs, the level is applied on the next tick, which
    /// also ends the sequence without calling its end callback.
    pub fn set_light(&mut self, handle: LedHandle, on: bool) -> Result<(), LedError> {
        let led = self.leds.get_mut(handle.0).ok_or(LedError::InvalidHandle)?;

        if led.flash.is_some() {
            led.stop_pending = true;
            led.stop_level = on;
            return Ok(());
        }

        led.drive(&mut self.gpio, on)?;
        Ok(())
    }

    /// Start a flash sequence, replacing any active one
    ///
    /// The start level is driven immediately and the cycle restarts from
    /// zero. A pending stop is cancelled.
    pub fn set_flash(
        &mut self,
        handle: LedHandle,
        pattern: FlashPattern,
        end_cb: Option<E>,
    ) -> Result<(), LedError> {
        let led = self.leds.get_mut(handle.0).ok_or(LedError::InvalidHandle)?;

        if led.flash.is_none() && self.pool.free_count() == 0 {
            return Err(LedError::AllocationFailed);
        }

        led.drive(&mut self.gpio, pattern.edge.start_level())?;

        let config = FlashConfig::new(pattern, end_cb);
        match led.flash {
            Some(slot) => {
                self.pool.replace(slot, config);
            }
            None => {
                let slot = self
                    .pool
                    .alloc(config)
                    .map_err(|_| LedError::AllocationFailed)?;
                led.flash = Some(slot);
            }
        }
        led.stop_pending = false;

        debug!("led pin {} flash installed: {}", led.pin, pattern);
        Ok(())
    }

    /// Advance every LED by one tick; call on each LED timer firing
    pub fn tick(&mut self) {
        let period_ms = self.dispatch.period_ms();

        for led in self.leds.iter_mut() {
            if led.stop_pending {
                if let Err(e) = led.drive(&mut self.gpio, led.stop_level) {
                    warn!("led pin {} stop failed: {}", led.pin, e);
                    continue;
                }
                if let Some(slot) = led.flash.take() {
                    self.pool.free(slot);
                }
                led.stop_pending = false;
                debug!("led pin {} flash stopped", led.pin);
                continue;
            }

            let Some(slot) = led.flash else {
                continue;
            };
            let Some(config) = self.pool.get_mut(slot) else {
                led.flash = None;
                continue;
            };

            let step = config.advance(period_ms);
            if let Some(on) = step.drive {
                if let Err(e) = led.drive(&mut self.gpio, on) {
                    warn!("led pin {} write failed: {}", led.pin, e);
                }
            }

            if step.finished {
                config.notify_end();
                led.stop_pending = true;
                led.stop_level = config.pattern.edge.end_level();
                debug!("led pin {} flash complete", led.pin);
            }
        }
    }

    /// Last level driven on an LED
    pub fn is_lit(&self, handle: LedHandle) -> Result<bool, LedError> {
        self.leds
            .get(handle.0)
            .map(|led| led.lit)
            .ok_or(LedError::InvalidHandle)
    }

    /// Check if an LED holds a flash slot (including a sequence awaiting its stop tick)
    pub fn is_flashing(&self, handle: LedHandle) -> Result<bool, LedError> {
        self.leds
            .get(handle.0)
            .map(|led| led.flash.is_some())
            .ok_or(LedError::InvalidHandle)
    }

    /// Number of unused flash slots
    pub fn flash_slots_free(&self) -> usize {
        self.pool.free_count()
    }

    /// Number of registered LEDs
    pub fn len(&self) -> usize {
        self.leds.len()
    }

    /// Check if no LED is registered
    pub fn is_empty(&self) -> bool {
        self.leds.is_empty()
    }

    /// Check if the LED timer is running
    pub fn is_ticking(&self) -> bool {
        self.dispatch.is_running()
    }

    /// LED tick period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.dispatch.period_ms()
    }

    /// Access the GPIO port
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Access the GPIO port mutably
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Access the timer service
    pub fn timer(&self) -> &T {
        self.dispatch.timer()
    }
}
