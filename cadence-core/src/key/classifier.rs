//! Hold-duration classification
//!
//! The two user thresholds are sorted into `shorter <= longer`, a rule list
//! is chosen by which of them are set, and the first matching rule wins.
//! If sorting swapped the thresholds, the long-press labels are swapped back
//! so each label stays attached to the threshold the user gave it.

use super::status::KeyStatus;

/// Classified key event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyEvent {
    /// Released after at least the short-press time
    ShortPress,
    /// Long press for `threshold_a_ms`
    LongPress1,
    /// Long press for `threshold_b_ms`
    LongPress2,
}

impl KeyEvent {
    /// Exchange the two long-press labels
    pub const fn swapped(self) -> Self {
        match self {
            KeyEvent::LongPress1 => KeyEvent::LongPress2,
            KeyEvent::LongPress2 => KeyEvent::LongPress1,
            KeyEvent::ShortPress => KeyEvent::ShortPress,
        }
    }
}

/// One classifier rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// Still held and just reached the duration
    HeldPast(u32, KeyEvent),
    /// Released after a hold in `[from, until)`
    ReleasedWithin(u32, u32, KeyEvent),
}

impl Rule {
    fn check(&self, status: &KeyStatus) -> Option<KeyEvent> {
        let hit = match *self {
            Rule::HeldPast(over, _) => status.pressed_past(over),
            Rule::ReleasedWithin(from, until, _) => status.released_within(from, until),
        };
        hit.then_some(self.event())
    }

    fn event(&self) -> KeyEvent {
        match *self {
            Rule::HeldPast(_, event) | Rule::ReleasedWithin(_, _, event) => event,
        }
    }
}

/// Long-press thresholds, normalized so `shorter_ms <= longer_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Thresholds {
    /// Smaller threshold (0 = disabled)
    pub shorter_ms: u32,
    /// Larger threshold (0 = disabled)
    pub longer_ms: u32,
    /// `threshold_a_ms` was the larger one
    pub swapped: bool,
}

impl Thresholds {
    /// Sort the user's thresholds
    pub const fn new(threshold_a_ms: u32, threshold_b_ms: u32) -> Self {
        if threshold_b_ms >= threshold_a_ms {
            Self {
                shorter_ms: threshold_a_ms,
                longer_ms: threshold_b_ms,
                swapped: false,
            }
        } else {
            Self {
                shorter_ms: threshold_b_ms,
                longer_ms: threshold_a_ms,
                swapped: true,
            }
        }
    }

    /// Ordered rules for this threshold combination
    fn rules(&self, short_press_ms: u32) -> impl Iterator<Item = Rule> {
        use KeyEvent::*;

        // Sorted, so a set shorter threshold implies a set longer one
        let table = match (self.shorter_ms, self.longer_ms) {
            (0, 0) => [Some(Rule::HeldPast(short_press_ms, ShortPress)), None, None],
            (0, l) => [
                Some(Rule::HeldPast(l, LongPress2)),
                Some(Rule::ReleasedWithin(short_press_ms, l, ShortPress)),
                None,
            ],
            (s, l) => [
                Some(Rule::HeldPast(l, LongPress2)),
                Some(Rule::ReleasedWithin(s, l, LongPress1)),
                Some(Rule::ReleasedWithin(short_press_ms, s, ShortPress)),
            ],
        };
        table.into_iter().flatten()
    }
}

/// Classify a key's status after this tick's update
///
/// Returns at most one event; lower-priority rules are not evaluated once a
/// rule matches.
pub fn classify(status: &KeyStatus, thresholds: &Thresholds, short_press_ms: u32) -> Option<KeyEvent> {
    let event = thresholds
        .rules(short_press_ms)
        .find_map(|rule| rule.check(status))?;

    Some(if thresholds.swapped { event.swapped() } else { event })
}
