//! Key scan task
//!
//! Runs the key tick loop; every firing scans all registered keys.

use defmt::*;

use crate::engine::{Keys, Shared, KEY_TICK};

#[embassy_executor::task]
pub async fn key_tick_task(keys: &'static Shared<Keys>) {
    info!("Key tick task started");

    KEY_TICK
        .run(|| keys.lock(|keys| keys.borrow_mut().tick()))
        .await;
}
