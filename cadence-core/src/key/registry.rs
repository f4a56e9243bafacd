//! Key registry
//!
//! Registered keys are scanned by one shared repeating timer. The board glue
//! calls [`KeyRegistry::tick`] each time that timer fires; every key is
//! sampled, its status updated and classified, and its callback invoked at
//! most once for the tick.

use cadence_hal::{Direction, GpioPort, PinId, Polarity, TimerService};

use super::classifier::{classify, KeyEvent, Thresholds};
use super::status::KeyStatus;
use crate::config::{PinConfig, TimingConfig};
use crate::error::KeyError;
use crate::registry::{Registry, TickDispatch};

/// Receives classified key events
///
/// Runs inside the scan tick: it must return quickly and never block, since
/// every later key in the same tick waits for it.
pub trait KeyCallback {
    /// Handle one event
    fn on_key(&mut self, event: KeyEvent);
}

impl<F: FnMut(KeyEvent)> KeyCallback for F {
    fn on_key(&mut self, event: KeyEvent) {
        self(event)
    }
}

/// Key registration template
#[derive(Debug, Clone)]
pub struct KeyDevice<C> {
    /// Input pin
    pub port: PinId,
    /// Electrical level of a pressed key
    pub polarity: Polarity,
    /// Long press 1 threshold in ms (0 = disabled)
    pub threshold_a_ms: u32,
    /// Long press 2 threshold in ms (0 = disabled)
    pub threshold_b_ms: u32,
    /// Event callback (required)
    pub callback: Option<C>,
}

impl<C> KeyDevice<C> {
    /// Active-high key with no long-press thresholds and no callback
    pub const fn new(port: PinId) -> Self {
        Self {
            port,
            polarity: Polarity::ActiveHigh,
            threshold_a_ms: 0,
            threshold_b_ms: 0,
            callback: None,
        }
    }

    /// Key described by a board pin entry
    pub const fn from_pin(pin: PinConfig) -> Self {
        let mut device = Self::new(pin.pin);
        device.polarity = pin.polarity();
        device
    }

    /// Mark the key as pressed-when-low
    pub const fn active_low(mut self) -> Self {
        self.polarity = Polarity::ActiveLow;
        self
    }

    /// Set both long-press thresholds
    pub const fn with_thresholds(mut self, threshold_a_ms: u32, threshold_b_ms: u32) -> Self {
        self.threshold_a_ms = threshold_a_ms;
        self.threshold_b_ms = threshold_b_ms;
        self
    }

    /// Set the event callback
    pub fn on_event(mut self, callback: C) -> Self {
        self.callback = Some(callback);
        self
    }
}

struct KeyRecord<C> {
    port: PinId,
    polarity: Polarity,
    thresholds: Thresholds,
    callback: C,
    status: KeyStatus,
}

/// Registry of scanned keys
///
/// - `G`: GPIO port the keys are read through
/// - `T`: timer service providing the scan tick
/// - `C`: callback type shared by all keys
/// - `N`: maximum number of keys
pub struct KeyRegistry<G, T, C, const N: usize>
where
    G: GpioPort,
    T: TimerService,
    C: KeyCallback,
{
    gpio: G,
    dispatch: TickDispatch<T>,
    keys: Registry<KeyRecord<C>, N>,
    short_press_ms: u32,
}

impl<G, T, C, const N: usize> KeyRegistry<G, T, C, N>
where
    G: GpioPort,
    T: TimerService,
    C: KeyCallback,
{
    /// Create an empty registry with default timing
    pub fn new(gpio: G, timer: T) -> Self {
        Self::with_timing(gpio, timer, &TimingConfig::default())
    }

    /// Create an empty registry with custom timing
    pub fn with_timing(gpio: G, timer: T, timing: &TimingConfig) -> Self {
        Self {
            gpio,
            dispatch: TickDispatch::new(timer, timing.key_period()),
            keys: Registry::new(),
            short_press_ms: timing.key_short_press_ms,
        }
    }

    /// Register a key
    ///
    /// Configures the pin as an input and, for the first key, creates and
    /// starts the scan timer. On error nothing is registered.
    pub fn register(&mut self, device: KeyDevice<C>) -> Result<(), KeyError> {
        let callback = device.callback.ok_or(KeyError::CallbackMissing)?;
        if !self.keys.has_room() {
            return Err(KeyError::AllocationFailed);
        }

        self.gpio
            .init(device.port, Direction::Input, device.polarity.is_active_low())?;
        self.dispatch.start_if_idle()?;

        let record = KeyRecord {
            port: device.port,
            polarity: device.polarity,
            thresholds: Thresholds::new(device.threshold_a_ms, device.threshold_b_ms),
            callback,
            status: KeyStatus::default(),
        };
        self.keys
            .push(record)
            .map_err(|_| KeyError::AllocationFailed)?;

        debug!(
            "key registered on pin {}, thresholds {}/{} ms",
            device.port, device.threshold_a_ms, device.threshold_b_ms
        );
        Ok(())
    }

    /// Re-initialize every key pin and restart the scan timer from zero
    ///
    /// Callbacks, thresholds and key status are kept. Every pin is tried and
    /// the timer is restarted even if a pin fails; the first error is
    /// returned.
    pub fn reset(&mut self) -> Result<(), KeyError> {
        if self.keys.is_empty() {
            return Err(KeyError::NothingRegistered);
        }

        let mut result = Ok(());
        for key in self.keys.iter() {
            if let Err(e) = self
                .gpio
                .init(key.port, Direction::Input, key.polarity.is_active_low())
            {
                warn!("key pin {} re-init failed: {}", key.port, e);
                if result.is_ok() {
                    result = Err(KeyError::from(e));
                }
            }
        }

        let restarted = self.dispatch.restart().map_err(KeyError::from);
        result.and(restarted)
    }

    /// Scan every key once; call on each scan timer firing
    pub fn tick(&mut self) {
        let period_ms = self.dispatch.period_ms();

        for key in self.keys.iter_mut() {
            let high = match self.gpio.read(key.port) {
                Ok(high) => high,
                Err(e) => {
                    warn!("key pin {} read failed: {}", key.port, e);
                    continue;
                }
            };

            key.status.update(key.polarity.to_logical(high), period_ms);

            if let Some(event) = classify(&key.status, &key.thresholds, self.short_press_ms) {
                trace!("key pin {}: {}", key.port, event);
                key.callback.on_key(event);
            }
        }
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if no key is registered
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Pin and status of every key, newest registration first
    pub fn statuses(&self) -> impl Iterator<Item = (PinId, KeyStatus)> + '_ {
        self.keys.iter().map(|key| (key.port, key.status))
    }

    /// Check if the scan timer is running
    pub fn is_ticking(&self) -> bool {
        self.dispatch.is_running()
    }

    /// Scan period in milliseconds
    pub fn period_ms(&self) -> u32 {
        self.dispatch.period_ms()
    }

    /// Access the GPIO port
    pub fn gpio(&self) -> &G {
        &self.gpio
    }

    /// Access the GPIO port mutably
    pub fn gpio_mut(&mut self) -> &mut G {
        &mut self.gpio
    }

    /// Access the timer service
    pub fn timer(&self) -> &T {
        self.dispatch.timer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockGpio, MockTimer, TimerOp};
    use cadence_hal::{GpioError, TimerError, TimerMode};
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<std::vec::Vec<(PinId, KeyEvent)>>>;

    /// Records events tagged with the key's pin
    struct Recorder {
        log: Log,
        port: PinId,
    }

    impl KeyCallback for Recorder {
        fn on_key(&mut self, event: KeyEvent) {
            self.log.borrow_mut().push((self.port, event));
        }
    }

    type Keys = KeyRegistry<MockGpio, MockTimer, Recorder, 4>;

    fn keys() -> (Keys, Log) {
        (KeyRegistry::new(MockGpio::new(), MockTimer::new()), Log::default())
    }

    fn device(log: &Log, port: PinId) -> KeyDevice<Recorder> {
        KeyDevice::new(port).on_event(Recorder {
            log: log.clone(),
            port,
        })
    }

    /// Hold `port` until its duration reaches `ms`, then release for one tick
    fn hold(keys: &mut Keys, port: PinId, ms: u32) {
        keys.gpio_mut().press(port, true);
        for _ in 0..=(ms / keys.period_ms()) {
            keys.tick();
        }
        keys.gpio_mut().press(port, false);
        keys.tick();
    }

    #[test]
    fn test_register_requires_callback() {
        let (mut keys, _) = keys();
        let result = keys.register(KeyDevice::new(3).with_thresholds(100, 200));
        assert_eq!(result, Err(KeyError::CallbackMissing));
        assert!(keys.is_empty());
        assert!(!keys.is_ticking());
        assert!(keys.timer().ops().is_empty());
        assert_eq!(keys.gpio().pin(3).inits, 0);
    }

    #[test]
    fn test_first_registration_starts_timer() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 1)).unwrap();
        keys.register(device(&log, 2)).unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(
            keys.timer().ops(),
            &[TimerOp::Create(0, 10, TimerMode::Repeated), TimerOp::Start(0)]
        );
    }

    #[test]
    fn test_register_configures_input() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 5).active_low()).unwrap();

        let pin = keys.gpio().pin(5);
        assert_eq!(pin.direction, Some(Direction::Input));
        assert!(pin.active_low);
    }

    #[test]
    fn test_register_when_full() {
        let (mut keys, log) = keys();
        for port in 0..4 {
            keys.register(device(&log, port)).unwrap();
        }
        assert_eq!(keys.register(device(&log, 9)), Err(KeyError::AllocationFailed));
        assert_eq!(keys.len(), 4);
        assert_eq!(keys.gpio().pin(9).inits, 0);
    }

    #[test]
    fn test_register_invalid_pin() {
        let (mut keys, log) = keys();
        assert_eq!(
            keys.register(device(&log, 200)),
            Err(KeyError::Gpio(GpioError::InvalidPin))
        );
        assert!(keys.is_empty());
        assert!(!keys.is_ticking());
    }

    #[test]
    fn test_register_timer_failure_leaves_registry_empty() {
        let mut timer = MockTimer::new();
        timer.fail_create = true;
        let mut keys: Keys = KeyRegistry::new(MockGpio::new(), timer);
        let log = Log::default();

        assert_eq!(
            keys.register(device(&log, 1)),
            Err(KeyError::Timer(TimerError::NoResources))
        );
        assert!(keys.is_empty());
    }

    #[test]
    fn test_reset_requires_keys() {
        let (mut keys, _) = keys();
        assert_eq!(keys.reset(), Err(KeyError::NothingRegistered));
    }

    #[test]
    fn test_reset_reinitializes_and_restarts() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 1).with_thresholds(0, 500)).unwrap();
        keys.register(device(&log, 2)).unwrap();

        keys.reset().unwrap();

        assert_eq!(keys.gpio().pin(1).inits, 2);
        assert_eq!(keys.gpio().pin(2).inits, 2);
        assert_eq!(
            keys.timer().ops(),
            &[
                TimerOp::Create(0, 10, TimerMode::Repeated),
                TimerOp::Start(0),
                TimerOp::Delete(0),
                TimerOp::Create(1, 10, TimerMode::Repeated),
                TimerOp::Start(1),
            ]
        );

        // Thresholds and callbacks survive the reset
        hold(&mut keys, 1, 600);
        assert_eq!(log.borrow().as_slice(), &[(1, KeyEvent::LongPress2)]);
    }

    #[test]
    fn test_reset_continues_past_failed_pin() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 1)).unwrap();
        keys.register(device(&log, 2)).unwrap();
        keys.gpio_mut().faulty = Some(2);

        assert_eq!(keys.reset(), Err(KeyError::Gpio(GpioError::NotConfigured)));

        assert_eq!(keys.gpio().pin(1).inits, 2);
        assert_eq!(keys.gpio().pin(2).inits, 1);
        assert_eq!(
            keys.timer().ops()[2..],
            [TimerOp::Delete(0), TimerOp::Create(1, 10, TimerMode::Repeated), TimerOp::Start(1)]
        );
        assert!(keys.is_ticking());

        // The healthy key keeps scanning
        hold(&mut keys, 1, 50);
        assert_eq!(log.borrow().as_slice(), &[(1, KeyEvent::ShortPress)]);
    }

    #[test]
    fn test_long_press_2_only_threshold_b() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 4).with_thresholds(0, 500)).unwrap();

        keys.gpio_mut().press(4, true);
        let mut fired_at = None;
        for tick in 0..=60 {
            keys.tick();
            if fired_at.is_none() && !log.borrow().is_empty() {
                fired_at = Some(tick);
            }
        }
        keys.gpio_mut().press(4, false);
        keys.tick();
        keys.tick();

        // Press seen at tick 0 with duration 0
        assert_eq!(fired_at, Some(50));
        assert_eq!(log.borrow().as_slice(), &[(4, KeyEvent::LongPress2)]);
    }

    #[test]
    fn test_active_low_key() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 6).active_low().with_thresholds(1000, 3000))
            .unwrap();

        // Idle pulled high: no events
        for _ in 0..20 {
            keys.tick();
        }
        assert!(log.borrow().is_empty());
        assert!(keys.gpio().pin(6).high);

        hold(&mut keys, 6, 120);
        assert_eq!(log.borrow().as_slice(), &[(6, KeyEvent::ShortPress)]);
    }

    #[test]
    fn test_keys_visited_newest_first() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 1)).unwrap();
        keys.register(device(&log, 2)).unwrap();

        keys.gpio_mut().press(1, true);
        keys.gpio_mut().press(2, true);
        for _ in 0..5 {
            keys.tick();
        }
        assert!(log.borrow().is_empty());
        keys.tick(); // both reach 50 ms
        assert_eq!(
            log.borrow().as_slice(),
            &[(2, KeyEvent::ShortPress), (1, KeyEvent::ShortPress)]
        );

        let order: std::vec::Vec<PinId> = keys.statuses().map(|(port, _)| port).collect();
        assert_eq!(order, [2, 1]);
    }

    #[test]
    fn test_failed_read_skips_only_that_key() {
        let (mut keys, log) = keys();
        keys.register(device(&log, 1)).unwrap();
        keys.register(device(&log, 2)).unwrap();
        keys.gpio_mut().faulty = Some(2);

        keys.gpio_mut().press(1, true);
        for _ in 0..6 {
            keys.tick();
        }

        assert_eq!(log.borrow().as_slice(), &[(1, KeyEvent::ShortPress)]);
        let statuses: std::vec::Vec<_> = keys.statuses().collect();
        assert_eq!(statuses[0].1, KeyStatus::default());
        assert_eq!(statuses[1].1.cur_duration_ms, 50);
    }

    #[test]
    fn test_custom_timing() {
        let timing = TimingConfig {
            key_scan_period_ms: 20,
            key_short_press_ms: 100,
            ..Default::default()
        };
        let mut keys: Keys = KeyRegistry::with_timing(MockGpio::new(), MockTimer::new(), &timing);
        let log = Log::default();
        keys.register(device(&log, 1).with_thresholds(1000, 2000)).unwrap();
        assert_eq!(keys.timer().ops()[0], TimerOp::Create(0, 20, TimerMode::Repeated));

        hold(&mut keys, 1, 80);
        assert!(log.borrow().is_empty());
        hold(&mut keys, 1, 100);
        assert_eq!(log.borrow().as_slice(), &[(1, KeyEvent::ShortPress)]);
    }

    proptest! {
        #[test]
        fn prop_duration_resets_exactly_on_change(trace in proptest::collection::vec(any::<bool>(), 1..200)) {
            let (mut keys, log) = keys();
            keys.register(device(&log, 1).with_thresholds(100, 300)).unwrap();

            let mut last: Option<KeyStatus> = None;
            for level in trace {
                keys.gpio_mut().press(1, level);
                let before = log.borrow().len();
                keys.tick();
                prop_assert!(log.borrow().len() - before <= 1);
                let (_, status) = keys.statuses().next().unwrap();
                let prev = last.unwrap_or_default();
                if status.cur_level != prev.cur_level {
                    prop_assert_eq!(status.cur_duration_ms, 0);
                } else {
                    prop_assert_eq!(status.cur_duration_ms, prev.cur_duration_ms + 10);
                }
                prop_assert_eq!(status.prv_duration_ms, prev.cur_duration_ms);
                last = Some(status);
            }
        }

        #[test]
        fn prop_threshold_order_symmetry(trace in proptest::collection::vec(any::<bool>(), 1..300)) {
            let run = |a: u32, b: u32| {
                let (mut keys, log) = keys();
                keys.register(device(&log, 1).with_thresholds(a, b)).unwrap();
                for &level in &trace {
                    keys.gpio_mut().press(1, level);
                    keys.tick();
                }
                let events: std::vec::Vec<KeyEvent> =
                    log.borrow().iter().map(|&(_, e)| e).collect();
                events
            };

            let forward = run(100, 200);
            let reversed: std::vec::Vec<KeyEvent> =
                run(200, 100).into_iter().map(KeyEvent::swapped).collect();
            prop_assert_eq!(forward, reversed);
        }
    }
}
