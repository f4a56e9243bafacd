//! LED sequencer task

use defmt::*;

use crate::engine::{Leds, Shared, LED_TICK};

#[embassy_executor::task]
pub async fn led_tick_task(leds: &'static Shared<Leds>) {
    info!("LED tick task started");

    LED_TICK
        .run(|| leds.lock(|leds| leds.borrow_mut().tick()))
        .await;
}
