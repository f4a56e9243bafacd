//! Inter-task communication channels
//!
//! Engine callbacks run inside a tick with the registry locked, so they only
//! post to a channel and return. The controller task does the actual work.

use cadence_core::KeyEvent;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use portable_atomic::{AtomicU32, Ordering};

/// Channel capacity for UI events
const UI_CHANNEL_SIZE: usize = 8;

/// Events for the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum UiEvent {
    /// Classified record-key press
    Key(KeyEvent),
    /// Acknowledge blink finished
    AckDone,
}

pub static UI_EVENTS: Channel<CriticalSectionRawMutex, UiEvent, UI_CHANNEL_SIZE> = Channel::new();

/// Events lost because the controller fell behind
pub static DROPPED_EVENTS: AtomicU32 = AtomicU32::new(0);

/// Key callback
pub fn on_key(event: KeyEvent) {
    post(UiEvent::Key(event));
}

/// End callback of the acknowledge blink
pub fn on_ack_done() {
    post(UiEvent::AckDone);
}

fn post(event: UiEvent) {
    if UI_EVENTS.try_send(event).is_err() {
        DROPPED_EVENTS.fetch_add(1, Ordering::Relaxed);
    }
}
