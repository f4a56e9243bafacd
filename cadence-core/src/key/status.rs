//! Per-key rolling state

/// Level and stable-duration of a key at the current and previous tick
///
/// `cur_duration_ms` restarts at zero on every level change and otherwise
/// grows by one scan period per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyStatus {
    /// Pressed at this tick
    pub cur_level: bool,
    /// Pressed at the previous tick
    pub prv_level: bool,
    /// Time the current level has been held (ms)
    pub cur_duration_ms: u32,
    /// `cur_duration_ms` as of the previous tick
    pub prv_duration_ms: u32,
}

impl KeyStatus {
    /// Shift current state into previous and apply a new sample
    pub fn update(&mut self, pressed: bool, period_ms: u32) {
        self.prv_level = self.cur_level;
        self.prv_duration_ms = self.cur_duration_ms;

        if pressed != self.cur_level {
            self.cur_level = pressed;
            self.cur_duration_ms = 0;
        } else {
            self.cur_duration_ms = self.cur_duration_ms.saturating_add(period_ms);
        }
    }

    /// Held continuously and just reached `over_ms` this tick
    pub fn pressed_past(&self, over_ms: u32) -> bool {
        self.cur_level && self.cur_duration_ms >= over_ms && self.prv_duration_ms < over_ms
    }

    /// Released this tick after a hold in `[over_ms, under_ms)`
    pub fn released_within(&self, over_ms: u32, under_ms: u32) -> bool {
        self.prv_level
            && !self.cur_level
            && self.prv_duration_ms >= over_ms
            && self.prv_duration_ms < under_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_grows_while_stable() {
        let mut status = KeyStatus::default();
        status.update(false, 10);
        status.update(false, 10);
        assert_eq!(status.cur_duration_ms, 20);
        assert_eq!(status.prv_duration_ms, 10);
    }

    #[test]
    fn test_duration_resets_on_change() {
        let mut status = KeyStatus::default();
        status.update(false, 10);
        status.update(true, 10);
        assert!(status.cur_level);
        assert!(!status.prv_level);
        assert_eq!(status.cur_duration_ms, 0);
        assert_eq!(status.prv_duration_ms, 10);
    }

    #[test]
    fn test_pressed_past_fires_on_crossing_only() {
        let mut status = KeyStatus::default();
        status.update(true, 10); // 0 ms
        for _ in 0..4 {
            status.update(true, 10);
        }
        // 40 ms held
        assert!(!status.pressed_past(50));
        status.update(true, 10); // 50 ms
        assert!(status.pressed_past(50));
        status.update(true, 10); // 60 ms
        assert!(!status.pressed_past(50));
    }

    #[test]
    fn test_released_within_window() {
        let mut status = KeyStatus {
            cur_level: true,
            prv_level: true,
            cur_duration_ms: 120,
            prv_duration_ms: 110,
        };
        status.update(false, 10);
        assert!(status.released_within(100, 200));
        assert!(status.released_within(120, 121));
        assert!(!status.released_within(50, 120));
        assert!(!status.released_within(121, 200));
    }

    #[test]
    fn test_duration_saturates() {
        let mut status = KeyStatus {
            cur_duration_ms: u32::MAX - 5,
            ..Default::default()
        };
        status.update(false, 10);
        assert_eq!(status.cur_duration_ms, u32::MAX);
    }
}
