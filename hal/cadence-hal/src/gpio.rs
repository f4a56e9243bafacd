//! GPIO port abstraction
//!
//! Pins are addressed by number through a single port object, the way the
//! board's GPIO layer exposes them. Polarity is translated by the caller
//! before `write` and after `read`; `init` receives it only so the layer can
//! pick the matching pull resistor and idle output level.

/// GPIO pin number
pub type PinId = u8;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Digital input
    Input,
    /// Digital output
    Output,
}

/// Which electrical level means "active" (pressed key, lit LED)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    /// Active when the pin is high
    #[default]
    ActiveHigh,
    /// Active when the pin is low
    ActiveLow,
}

impl Polarity {
    /// Build from the `active_low` flag used in board tables
    pub const fn from_active_low(active_low: bool) -> Self {
        if active_low {
            Polarity::ActiveLow
        } else {
            Polarity::ActiveHigh
        }
    }

    /// Check if this is active-low
    pub const fn is_active_low(self) -> bool {
        matches!(self, Polarity::ActiveLow)
    }

    /// Electrical level to drive for a logical state
    pub const fn to_physical(self, active: bool) -> bool {
        active != self.is_active_low()
    }

    /// Logical state for a sampled electrical level
    pub const fn to_logical(self, high: bool) -> bool {
        high != self.is_active_low()
    }
}

/// Errors reported by the GPIO layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin number does not exist on this chip or board
    InvalidPin,
    /// Pin has not been initialized
    NotConfigured,
    /// Pin is configured for the other direction
    WrongDirection,
}

/// Port-addressed digital I/O
pub trait GpioPort {
    /// Configure a pin
    ///
    /// Inputs get a pull resistor toward the inactive level (pull-up for
    /// active-low). Outputs are driven to their inactive level.
    fn init(&mut self, pin: PinId, direction: Direction, active_low: bool) -> Result<(), GpioError>;

    /// Drive an output pin to an electrical level (`true` = high)
    fn write(&mut self, pin: PinId, high: bool) -> Result<(), GpioError>;

    /// Sample an input pin's electrical level (`true` = high)
    fn read(&mut self, pin: PinId) -> Result<bool, GpioError>;
}

impl<G: GpioPort + ?Sized> GpioPort for &mut G {
    fn init(&mut self, pin: PinId, direction: Direction, active_low: bool) -> Result<(), GpioError> {
        (**self).init(pin, direction, active_low)
    }

    fn write(&mut self, pin: PinId, high: bool) -> Result<(), GpioError> {
        (**self).write(pin, high)
    }

    fn read(&mut self, pin: PinId) -> Result<bool, GpioError> {
        (**self).read(pin)
    }
}
