//! GPIO port over embassy-rp `Flex` pins
//!
//! Pins are handed to the bank once at boot and are then addressed by GPIO
//! number, so the engine can switch direction and polarity at runtime.

use cadence_hal::{Direction, GpioError, GpioPort, PinId};
use embassy_rp::gpio::{AnyPin, Flex, Level, Pull};
use embassy_rp::Peri;

/// Number of user GPIOs on the RP2040 (GPIO0..=GPIO29)
pub const PIN_COUNT: usize = 30;

struct BankPin {
    flex: Flex<'static>,
    direction: Option<Direction>,
}

/// Pins attached to the engine, indexed by GPIO number
pub struct FlexBank {
    pins: [Option<BankPin>; PIN_COUNT],
}

impl Default for FlexBank {
    fn default() -> Self {
        Self::new()
    }
}

impl FlexBank {
    /// Create an empty bank
    pub const fn new() -> Self {
        Self {
            pins: [const { None }; PIN_COUNT],
        }
    }

    /// Hand a pin to the bank under its GPIO number
    ///
    /// The pin stays unconfigured until the engine calls `init` on it.
    pub fn attach(&mut self, pin: PinId, peri: Peri<'static, AnyPin>) -> Result<(), GpioError> {
        let slot = self
            .pins
            .get_mut(pin as usize)
            .ok_or(GpioError::InvalidPin)?;
        *slot = Some(BankPin {
            flex: Flex::new(peri),
            direction: None,
        });
        Ok(())
    }

    /// Check if a GPIO number has a pin attached
    pub fn is_attached(&self, pin: PinId) -> bool {
        matches!(self.pins.get(pin as usize), Some(Some(_)))
    }

    fn get(&mut self, pin: PinId) -> Result<&mut BankPin, GpioError> {
        self.pins
            .get_mut(pin as usize)
            .ok_or(GpioError::InvalidPin)?
            .as_mut()
            .ok_or(GpioError::NotConfigured)
    }
}

impl GpioPort for FlexBank {
    fn init(&mut self, pin: PinId, direction: Direction, active_low: bool) -> Result<(), GpioError> {
        let bank_pin = self.get(pin)?;
        match direction {
            Direction::Input => {
                // Pull towards the released level
                bank_pin
                    .flex
                    .set_pull(if active_low { Pull::Up } else { Pull::Down });
                bank_pin.flex.set_as_input();
            }
            Direction::Output => {
                // Latch the off level before enabling the driver
                bank_pin.flex.set_level(Level::from(active_low));
                bank_pin.flex.set_as_output();
            }
        }
        bank_pin.direction = Some(direction);
        Ok(())
    }

    fn write(&mut self, pin: PinId, high: bool) -> Result<(), GpioError> {
        let bank_pin = self.get(pin)?;
        match bank_pin.direction {
            Some(Direction::Output) => {
                bank_pin.flex.set_level(Level::from(high));
                Ok(())
            }
            Some(Direction::Input) => Err(GpioError::WrongDirection),
            None => Err(GpioError::NotConfigured),
        }
    }

    fn read(&mut self, pin: PinId) -> Result<bool, GpioError> {
        let bank_pin = self.get(pin)?;
        match bank_pin.direction {
            Some(_) => Ok(bank_pin.flex.is_high()),
            None => Err(GpioError::NotConfigured),
        }
    }
}
