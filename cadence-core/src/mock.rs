//! Mock GPIO port and timer service for host tests

use cadence_hal::{Direction, GpioError, GpioPort, PinId, TimerError, TimerMode, TimerService};

/// Highest pin number the mock port accepts
pub const MOCK_PIN_COUNT: usize = 32;

/// Simulated pin
#[derive(Debug, Clone, Copy, Default)]
pub struct MockPin {
    /// Configured direction, `None` until `init`
    pub direction: Option<Direction>,
    /// Configured polarity flag
    pub active_low: bool,
    /// Electrical level (driven for outputs, injected for inputs)
    pub high: bool,
    /// Number of `init` calls
    pub inits: u32,
    /// Number of `write` calls
    pub writes: u32,
}

/// Mock GPIO port
///
/// Inputs idle at their inactive level like a pulled pin; tests change them
/// with [`MockGpio::set_input`].
#[derive(Debug, Clone)]
pub struct MockGpio {
    pub pins: [MockPin; MOCK_PIN_COUNT],
    /// Pin whose reads and writes fail
    pub faulty: Option<PinId>,
}

impl MockGpio {
    pub fn new() -> Self {
        Self {
            pins: [MockPin::default(); MOCK_PIN_COUNT],
            faulty: None,
        }
    }

    pub fn pin(&self, pin: PinId) -> &MockPin {
        &self.pins[pin as usize]
    }

    /// Drive an input pin electrically
    pub fn set_input(&mut self, pin: PinId, high: bool) {
        self.pins[pin as usize].high = high;
    }

    /// Drive an input pin to its logical pressed/released state
    pub fn press(&mut self, pin: PinId, pressed: bool) {
        let p = &mut self.pins[pin as usize];
        p.high = pressed != p.active_low;
    }

    /// Logical (polarity-adjusted) state of an output pin
    pub fn is_lit(&self, pin: PinId) -> bool {
        let p = self.pin(pin);
        p.high != p.active_low
    }

    fn check(&self, pin: PinId) -> Result<(), GpioError> {
        if pin as usize >= MOCK_PIN_COUNT {
            return Err(GpioError::InvalidPin);
        }
        if self.faulty == Some(pin) {
            return Err(GpioError::NotConfigured);
        }
        Ok(())
    }
}

impl GpioPort for MockGpio {
    fn init(&mut self, pin: PinId, direction: Direction, active_low: bool) -> Result<(), GpioError> {
        self.check(pin)?;
        let p = &mut self.pins[pin as usize];
        p.direction = Some(direction);
        p.active_low = active_low;
        // Pull resistor or idle output both sit at the inactive level
        p.high = active_low;
        p.inits += 1;
        Ok(())
    }

    fn write(&mut self, pin: PinId, high: bool) -> Result<(), GpioError> {
        self.check(pin)?;
        let p = &mut self.pins[pin as usize];
        match p.direction {
            Some(Direction::Output) => {
                p.high = high;
                p.writes += 1;
                Ok(())
            }
            Some(Direction::Input) => Err(GpioError::WrongDirection),
            None => Err(GpioError::NotConfigured),
        }
    }

    fn read(&mut self, pin: PinId) -> Result<bool, GpioError> {
        self.check(pin)?;
        let p = &self.pins[pin as usize];
        match p.direction {
            Some(_) => Ok(p.high),
            None => Err(GpioError::NotConfigured),
        }
    }
}

/// Recorded timer-service call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOp {
    Create(u8, u32, TimerMode),
    Start(u8),
    Delete(u8),
}

/// Mock timer service recording every call
#[derive(Debug, Clone, Default)]
pub struct MockTimer {
    ops: std::vec::Vec<TimerOp>,
    next: u8,
    live: usize,
    pub fail_create: bool,
    pub fail_start: bool,
}

impl MockTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[TimerOp] {
        &self.ops
    }

    /// Timers created and not yet deleted
    pub fn live(&self) -> usize {
        self.live
    }
}

impl TimerService for MockTimer {
    type Handle = u8;

    fn create(&mut self, period_ms: u32, mode: TimerMode) -> Result<u8, TimerError> {
        if self.fail_create {
            return Err(TimerError::NoResources);
        }
        let id = self.next;
        self.next += 1;
        self.live += 1;
        self.ops.push(TimerOp::Create(id, period_ms, mode));
        Ok(id)
    }

    fn start(&mut self, handle: u8) -> Result<(), TimerError> {
        if self.fail_start {
            return Err(TimerError::InvalidHandle);
        }
        self.ops.push(TimerOp::Start(handle));
        Ok(())
    }

    fn delete(&mut self, handle: u8) -> Result<(), TimerError> {
        self.live -= 1;
        self.ops.push(TimerOp::Delete(handle));
        Ok(())
    }
}
