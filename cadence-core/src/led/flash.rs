//! Flash patterns and the per-tick flash state machine

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Called once when a finite flash sequence completes
///
/// Runs inside the LED tick and must not block.
pub trait FlashCallback {
    /// The sequence reached the end of its duration or count
    fn on_flash_end(&mut self);
}

impl<F: FnMut()> FlashCallback for F {
    fn on_flash_end(&mut self) {
        self()
    }
}

/// How a sequence counts down
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlashMode {
    /// `total` is milliseconds of flashing
    FixedDuration,
    /// `total` is the number of full on/off cycles
    FixedCount,
    /// Runs until replaced or stopped with `set_light`
    Forever,
}

/// Light level at the start of a sequence and after it ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FlashEdge {
    /// Lit first, left lit
    StartOnEndOn,
    /// Lit first, left dark
    StartOnEndOff,
    /// Dark first, left lit
    StartOffEndOn,
    /// Dark first, left dark
    StartOffEndOff,
}

impl FlashEdge {
    /// Level driven when the sequence is installed and at each cycle start
    pub const fn start_level(self) -> bool {
        matches!(self, FlashEdge::StartOnEndOn | FlashEdge::StartOnEndOff)
    }

    /// Level applied once the sequence completes
    pub const fn end_level(self) -> bool {
        matches!(self, FlashEdge::StartOnEndOn | FlashEdge::StartOffEndOn)
    }
}

/// User-facing flash request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FlashPattern {
    /// Countdown kind
    pub mode: FlashMode,
    /// Start and end levels
    pub edge: FlashEdge,
    /// Lit part of a cycle (ms)
    pub on_ms: u16,
    /// Dark part of a cycle (ms)
    pub off_ms: u16,
    /// Milliseconds or cycle count, depending on `mode`; ignored for `Forever`
    pub total: u32,
}

impl FlashPattern {
    /// Flash for `total_ms` milliseconds
    pub const fn duration(edge: FlashEdge, on_ms: u16, off_ms: u16, total_ms: u32) -> Self {
        Self {
            mode: FlashMode::FixedDuration,
            edge,
            on_ms,
            off_ms,
            total: total_ms,
        }
    }

    /// Flash for `cycles` full on/off cycles
    pub const fn count(edge: FlashEdge, on_ms: u16, off_ms: u16, cycles: u32) -> Self {
        Self {
            mode: FlashMode::FixedCount,
            edge,
            on_ms,
            off_ms,
            total: cycles,
        }
    }

    /// Flash until stopped
    pub const fn forever(edge: FlashEdge, on_ms: u16, off_ms: u16) -> Self {
        Self {
            mode: FlashMode::Forever,
            edge,
            on_ms,
            off_ms,
            total: 0,
        }
    }

    /// Length of one on/off cycle (ms)
    pub const fn cycle_ms(&self) -> u32 {
        self.on_ms as u32 + self.off_ms as u32
    }
}

/// Outcome of one flash tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashStep {
    /// Logical level to drive, if the phase changed or repeated
    pub drive: Option<bool>,
    /// Countdown reached zero this tick
    pub finished: bool,
}

/// Active flash sequence
pub struct FlashConfig<E> {
    /// Requested pattern
    pub pattern: FlashPattern,
    /// Milliseconds or cycles left
    pub remaining: u32,
    /// Called once when a finite sequence completes
    pub end_cb: Option<E>,
    /// Time into the current cycle (ms)
    pub elapsed_ms: u32,
}

impl<E> FlashConfig<E> {
    /// Start a sequence at the beginning of its first cycle
    pub fn new(pattern: FlashPattern, end_cb: Option<E>) -> Self {
        Self {
            pattern,
            remaining: pattern.total,
            end_cb,
            elapsed_ms: 0,
        }
    }

    /// Advance by one tick
    pub fn advance(&mut self, period_ms: u32) -> FlashStep {
        let pattern = &self.pattern;
        let cycle = pattern.cycle_ms();
        let start = pattern.edge.start_level();
        let start_phase = u32::from(if start { pattern.on_ms } else { pattern.off_ms });

        self.elapsed_ms = self.elapsed_ms.saturating_add(period_ms);

        let mut cycle_done = false;
        let drive = if self.elapsed_ms >= cycle {
            self.elapsed_ms -= cycle;
            cycle_done = true;
            Some(start)
        } else if self.elapsed_ms >= start_phase {
            Some(!start)
        } else {
            None
        };

        match pattern.mode {
            FlashMode::FixedDuration => {
                self.remaining = self.remaining.saturating_sub(period_ms);
            }
            FlashMode::FixedCount if cycle_done => {
                self.remaining = self.remaining.saturating_sub(1);
            }
            FlashMode::FixedCount | FlashMode::Forever => {}
        }

        FlashStep {
            drive,
            finished: pattern.mode != FlashMode::Forever && self.remaining == 0,
        }
    }

    /// Run the end callback, if any
    pub fn notify_end(&mut self)
    where
        E: FlashCallback,
    {
        if let Some(cb) = self.end_cb.as_mut() {
            cb.on_flash_end();
        }
    }
}

/// Fixed set of flash configuration slots shared by all LEDs
pub struct FlashPool<E, const F: usize> {
    slots: [Option<FlashConfig<E>>; F],
}

impl<E, const F: usize> Default for FlashPool<E, F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, const F: usize> FlashPool<E, F> {
    /// Create a pool with every slot free
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
        }
    }

    /// Number of unused slots
    pub fn free_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    /// Store a configuration in a free slot
    ///
    /// Returns the configuration back if every slot is taken.
    pub fn alloc(&mut self, config: FlashConfig<E>) -> Result<usize, FlashConfig<E>> {
        match self.slots.iter().position(|slot| slot.is_none()) {
            Some(index) => {
                self.slots[index] = Some(config);
                Ok(index)
            }
            None => Err(config),
        }
    }

    /// Overwrite an allocated slot, dropping its previous configuration
    ///
    /// Returns false if `index` is not allocated.
    pub fn replace(&mut self, index: usize, config: FlashConfig<E>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) if slot.is_some() => {
                *slot = Some(config);
                true
            }
            _ => false,
        }
    }

    /// Get an allocated slot for update
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FlashConfig<E>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Release a slot
    pub fn free(&mut self, index: usize) -> Option<FlashConfig<E>> {
        self.slots.get_mut(index).and_then(Option::take)
    }
}
