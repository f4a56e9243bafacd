//! Cadence - key and LED timing demo firmware
//!
//! Runs the Cadence engine on an RP2040 board: one record key classified
//! into short and long presses, and two indicator LEDs driven by the flash
//! sequencer. Mirrors the record button and status lights of the gesture
//! controller the engine was written for.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::Ordering;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use cadence_core::{KeyDevice, KeyEvent, KeyRegistry, LedSequencer};
use cadence_hal_rp2040::{FlexBank, TickTimer};

use crate::board::{Board, LONG_PRESS_1_MS, LONG_PRESS_2_MS};
use crate::channels::{on_key, DROPPED_EVENTS};
use crate::engine::{Keys, Leds, Shared, KEY_TICK, LED_TICK};
use crate::tasks::Indicators;

mod board;
mod channels;
mod engine;
mod tasks;

// Registries live for the whole program and are shared with tasks
static KEYS: StaticCell<Shared<Keys>> = StaticCell::new();
static LEDS: StaticCell<Shared<Leds>> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Cadence firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = Board::load();

    // Hand the wired pins to the engine banks
    let mut key_bank = FlexBank::new();
    unwrap!(key_bank.attach(board.key.pin, p.PIN_14.into()));

    let mut led_bank = FlexBank::new();
    unwrap!(led_bank.attach(board.record_led.pin, p.PIN_15.into()));
    unwrap!(led_bank.attach(board.status_led.pin, p.PIN_25.into()));

    // Key classifier
    let mut keys: Keys =
        KeyRegistry::with_timing(key_bank, TickTimer::new(&KEY_TICK), &board.timing);
    let record_key = KeyDevice::from_pin(board.key)
        .with_thresholds(LONG_PRESS_1_MS, LONG_PRESS_2_MS)
        .on_event(on_key as fn(KeyEvent));
    unwrap!(keys.register(record_key));
    info!("Record key registered");

    // LED sequencer
    let mut leds: Leds =
        LedSequencer::with_timing(led_bank, TickTimer::new(&LED_TICK), &board.timing);
    let indicators = Indicators {
        status: unwrap!(leds.create_from(board.status_led)),
        record: unwrap!(leds.create_from(board.record_led)),
    };
    info!("Indicator LEDs registered");

    let keys = KEYS.init(Mutex::new(RefCell::new(keys)));
    let leds = LEDS.init(Mutex::new(RefCell::new(leds)));

    unwrap!(tasks::controller::show_idle(leds, indicators));

    // Spawn tasks
    spawner.spawn(tasks::key_tick_task(keys)).unwrap();
    spawner.spawn(tasks::led_tick_task(leds)).unwrap();
    spawner
        .spawn(tasks::controller_task(keys, leds, indicators))
        .unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!(
            "Main loop heartbeat, {} UI events dropped",
            DROPPED_EVENTS.load(Ordering::Relaxed)
        );
    }
}
