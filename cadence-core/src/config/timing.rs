//! Timing configuration
//!
//! Periods are in milliseconds. The key scan period must be short compared
//! with the shortest press the classifier should recognise; the LED tick
//! period should divide the configured flash on/off times evenly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default key scan period (ms)
pub const DEFAULT_KEY_SCAN_PERIOD_MS: u32 = 10;

/// Default minimum hold for a short press (ms)
pub const DEFAULT_KEY_SHORT_PRESS_MS: u32 = 50;

/// Default LED tick period (ms)
pub const DEFAULT_LED_TICK_PERIOD_MS: u32 = 100;

/// Tick periods and classifier constants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimingConfig {
    /// Key sampling period
    pub key_scan_period_ms: u32,
    /// Minimum hold recognised as a short press
    pub key_short_press_ms: u32,
    /// LED sequencer tick period
    pub led_tick_period_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            key_scan_period_ms: DEFAULT_KEY_SCAN_PERIOD_MS,
            key_short_press_ms: DEFAULT_KEY_SHORT_PRESS_MS,
            led_tick_period_ms: DEFAULT_LED_TICK_PERIOD_MS,
        }
    }
}

impl TimingConfig {
    /// Key scan period, never zero
    pub fn key_period(&self) -> u32 {
        self.key_scan_period_ms.max(1)
    }

    /// LED tick period, never zero
    pub fn led_period(&self) -> u32 {
        self.led_tick_period_ms.max(1)
    }

    /// Serialize into `buf` as postcard bytes
    #[cfg(feature = "serde")]
    pub fn to_bytes<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], postcard::Error> {
        postcard::to_slice(self, buf)
    }

    /// Deserialize from postcard bytes
    #[cfg(feature = "serde")]
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TimingConfig::default();
        assert_eq!(config.key_scan_period_ms, 10);
        assert_eq!(config.key_short_press_ms, 50);
        assert_eq!(config.led_tick_period_ms, 100);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let config = TimingConfig {
            key_scan_period_ms: 0,
            led_tick_period_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.key_period(), 1);
        assert_eq!(config.led_period(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_storage() {
        let config = TimingConfig {
            key_scan_period_ms: 5,
            key_short_press_ms: 40,
            led_tick_period_ms: 50,
        };
        let mut buf = [0u8; 32];
        let bytes = config.to_bytes(&mut buf).unwrap();
        assert_eq!(TimingConfig::from_bytes(bytes).unwrap(), config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decode_board_image() {
        // Small periods encode as one varint byte each
        assert_eq!(
            TimingConfig::from_bytes(&[10, 50, 100]).unwrap(),
            TimingConfig::default()
        );
        let mut buf = [0u8; 16];
        assert_eq!(TimingConfig::default().to_bytes(&mut buf).unwrap(), &[10, 50, 100]);

        // Truncated image
        assert!(TimingConfig::from_bytes(&[10, 50]).is_err());
    }
}
