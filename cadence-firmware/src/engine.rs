//! Engine instances shared between tasks
//!
//! Each registry sits behind a critical-section mutex: its tick task and the
//! controller are the only users, and neither holds the lock across an await.

use core::cell::RefCell;

use cadence_core::{KeyEvent, KeyRegistry, LedSequencer};
use cadence_hal_rp2040::{FlexBank, TickControl, TickTimer};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

pub const MAX_KEYS: usize = 2;
pub const MAX_LEDS: usize = 4;
pub const MAX_FLASHES: usize = 2;

pub type Keys = KeyRegistry<FlexBank, TickTimer<'static>, fn(KeyEvent), MAX_KEYS>;
pub type Leds = LedSequencer<FlexBank, TickTimer<'static>, fn(), MAX_LEDS, MAX_FLASHES>;

pub type Shared<T> = Mutex<CriticalSectionRawMutex, RefCell<T>>;

/// Key scan tick loop
pub static KEY_TICK: TickControl = TickControl::new();

/// LED tick loop
pub static LED_TICK: TickControl = TickControl::new();
