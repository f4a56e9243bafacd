//! Board wiring for the gesture-controller carrier
//!
//! Pin entries use the `gpioN` / `!gpioN` form; a leading `!` marks the
//! signal as active-low. The record key switches to ground and relies on the
//! internal pull-up.

use cadence_core::{PinConfig, TimingConfig};
use defmt::*;

/// Record key (to GND)
pub const KEY_PIN: &str = "!gpio14";

/// Red "recording" LED
pub const RECORD_LED_PIN: &str = "gpio15";

/// On-board status LED
pub const STATUS_LED_PIN: &str = "gpio25";

/// Hold time for the first long press (ms)
pub const LONG_PRESS_1_MS: u32 = 1_000;

/// Hold time for the second long press (ms)
pub const LONG_PRESS_2_MS: u32 = 3_000;

/// Board timing as a postcard image: key scan 10 ms, short press 50 ms,
/// LED tick 50 ms
pub const TIMING_IMAGE: &[u8] = &[10, 50, 50];

/// Resolved board description
pub struct Board {
    pub key: PinConfig,
    pub record_led: PinConfig,
    pub status_led: PinConfig,
    pub timing: TimingConfig,
}

impl Board {
    pub fn load() -> Self {
        let board = Self {
            key: pin_entry(KEY_PIN, PinConfig::inverted(14)),
            record_led: pin_entry(RECORD_LED_PIN, PinConfig::new(15)),
            status_led: pin_entry(STATUS_LED_PIN, PinConfig::new(25)),
            timing: timing_image(TIMING_IMAGE),
        };
        info!(
            "Board: key {}, record LED {}, status LED {}",
            board.key, board.record_led, board.status_led
        );
        info!("Timing: {}", board.timing);
        board
    }
}

fn pin_entry(entry: &str, fallback: PinConfig) -> PinConfig {
    match PinConfig::parse(entry) {
        Some(pin) => pin,
        None => {
            error!("Invalid pin entry '{}', using GPIO{}", entry, fallback.pin);
            fallback
        }
    }
}

fn timing_image(image: &[u8]) -> TimingConfig {
    match TimingConfig::from_bytes(image) {
        Ok(timing) => timing,
        Err(e) => {
            warn!("Invalid timing image: {}, using defaults", Debug2Format(&e));
            TimingConfig::default()
        }
    }
}
