//! Controller task
//!
//! Maps record-key events onto the indicator LEDs:
//!
//! - short press toggles recording (record LED flashes while active)
//! - long press 1 plays an acknowledge blink on the status LED
//! - long press 2 resets both engines and stops recording

use defmt::*;

use cadence_core::{FlashEdge, FlashPattern, KeyEvent, LedError, LedHandle};

use crate::channels::{on_ack_done, UiEvent, UI_EVENTS};
use crate::engine::{Keys, Leds, Shared};

/// Slow idle blink on the status LED
const HEARTBEAT: FlashPattern = FlashPattern::forever(FlashEdge::StartOnEndOff, 100, 1_900);

/// Record LED while recording
const RECORDING: FlashPattern = FlashPattern::forever(FlashEdge::StartOnEndOff, 300, 300);

/// Three quick blinks, then back to the heartbeat
const ACK: FlashPattern = FlashPattern::count(FlashEdge::StartOnEndOff, 100, 100, 3);

/// LEDs owned by the controller
#[derive(Clone, Copy)]
pub struct Indicators {
    pub status: LedHandle,
    pub record: LedHandle,
}

/// Start the idle indication
pub fn show_idle(leds: &Shared<Leds>, indicators: Indicators) -> Result<(), LedError> {
    leds.lock(|leds| {
        let mut leds = leds.borrow_mut();
        leds.set_light(indicators.record, false)?;
        leds.set_flash(indicators.status, HEARTBEAT, None)
    })
}

/// Controller task - reacts to UI events
#[embassy_executor::task]
pub async fn controller_task(
    keys: &'static Shared<Keys>,
    leds: &'static Shared<Leds>,
    indicators: Indicators,
) {
    info!("Controller task started");

    let mut recording = false;

    loop {
        let event = UI_EVENTS.receive().await;
        debug!("UI event: {}", event);

        let result = match event {
            UiEvent::Key(KeyEvent::ShortPress) => {
                recording = !recording;
                info!("Recording {}", if recording { "started" } else { "stopped" });
                leds.lock(|leds| {
                    let mut leds = leds.borrow_mut();
                    if recording {
                        leds.set_flash(indicators.record, RECORDING, None)
                    } else {
                        leds.set_light(indicators.record, false)
                    }
                })
            }
            UiEvent::Key(KeyEvent::LongPress1) => leds.lock(|leds| {
                leds.borrow_mut()
                    .set_flash(indicators.status, ACK, Some(on_ack_done as fn()))
            }),
            UiEvent::Key(KeyEvent::LongPress2) => {
                info!("Resetting key and LED engines");
                recording = false;
                if let Err(e) = keys.lock(|keys| keys.borrow_mut().reset()) {
                    warn!("Key reset failed: {}", e);
                }
                leds.lock(|leds| leds.borrow_mut().reset())
                    .and_then(|()| show_idle(leds, indicators))
            }
            UiEvent::AckDone => leds.lock(|leds| {
                leds.borrow_mut()
                    .set_flash(indicators.status, HEARTBEAT, None)
            }),
        };

        if let Err(e) = result {
            warn!("LED update for {} failed: {}", event, e);
        }
    }
}
