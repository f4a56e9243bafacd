//! Board pin descriptions
//!
//! Boards list their keys and LEDs as pin strings, e.g. `"gpio11"` or
//! `"!gpio12"` where the leading `!` marks an active-low pin.

use cadence_hal::{PinId, Polarity};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: PinId,
    /// Pin is active-low (inverted)
    pub active_low: bool,
}

impl PinConfig {
    /// Create an active-high pin config
    pub const fn new(pin: PinId) -> Self {
        Self {
            pin,
            active_low: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: PinId) -> Self {
        Self {
            pin,
            active_low: true,
        }
    }

    /// Polarity of this pin
    pub const fn polarity(&self) -> Polarity {
        Polarity::from_active_low(self.active_low)
    }

    /// Parse a pin string
    ///
    /// Supports formats:
    /// - "gpio11" -> pin 11, active-high
    /// - "!gpio12" -> pin 12, active-low
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        let (s, active_low) = match s.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (s, false),
        };

        let pin: PinId = s.strip_prefix("gpio")?.parse().ok()?;

        Some(Self { pin, active_low })
    }
}
