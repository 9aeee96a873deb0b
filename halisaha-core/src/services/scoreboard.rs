//! Scoreboard counters, key handling and clock text

use std::sync::Arc;

use chrono::Timelike;
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::domain::{KeyBindings, KeySlot};
use crate::ports::KeyValueStore;

use super::persisted::Persisted;

/// Storage key of the two counters
pub const COUNTERS_KEY: &str = "scoreboard_counters";

/// How the scoreboard was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreboardMode {
    /// Opened from the booking desk: behind the login, no alarms
    Embedded,
    /// Dedicated display: no login, alarms on
    Standalone,
}

impl ScoreboardMode {
    pub fn requires_login(&self) -> bool {
        matches!(self, ScoreboardMode::Embedded)
    }

    pub fn alarms_enabled(&self) -> bool {
        matches!(self, ScoreboardMode::Standalone)
    }
}

/// Score of box A (left) and box B (right)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub left: u32,
    pub right: u32,
}

impl Counters {
    pub fn apply(&mut self, slot: KeySlot) {
        match slot {
            KeySlot::AIncrement => self.left += 1,
            KeySlot::ADecrement => self.left = self.left.saturating_sub(1),
            KeySlot::BIncrement => self.right += 1,
            KeySlot::BDecrement => self.right = self.right.saturating_sub(1),
        }
    }
}

/// Counter value as shown on the board
pub fn format_counter(value: u32) -> String {
    format!("{:02}", value)
}

/// `HH:MM`, or `HH:MM:SS` with seconds on
pub fn clock_text(now: &impl Timelike, show_seconds: bool) -> String {
    if show_seconds {
        format!("{:02}:{:02}:{:02}", now.hour(), now.minute(), now.second())
    } else {
        format!("{:02}:{:02}", now.hour(), now.minute())
    }
}

pub struct ScoreboardService {
    counters: Persisted<Counters>,
}

impl ScoreboardService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            counters: Persisted::load(store, COUNTERS_KEY, Counters::default)?,
        })
    }

    pub fn counters(&self) -> Counters {
        *self.counters.get()
    }

    /// Apply a pressed key; returns the slot it triggered, if any
    pub fn handle_key(&mut self, key: char, bindings: &KeyBindings) -> Result<Option<KeySlot>> {
        let Some(slot) = bindings.resolve(key) else {
            return Ok(None);
        };
        self.apply(slot)?;
        Ok(Some(slot))
    }

    pub fn apply(&mut self, slot: KeySlot) -> Result<Counters> {
        self.counters.update(|c| {
            c.apply(slot);
            *c
        })
    }

    pub fn reset(&mut self) -> Result<()> {
        self.counters.set(Counters::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKvStore;
    use chrono::NaiveTime;

    #[test]
    fn test_keys_drive_their_box() {
        let mut board = ScoreboardService::new(Arc::new(MemoryKvStore::new())).unwrap();
        let keys = KeyBindings::default();

        assert_eq!(board.handle_key('q', &keys).unwrap(), Some(KeySlot::AIncrement));
        board.handle_key('Q', &keys).unwrap();
        board.handle_key('p', &keys).unwrap();
        board.handle_key('l', &keys).unwrap();
        board.handle_key('l', &keys).unwrap();
        assert_eq!(board.handle_key('z', &keys).unwrap(), None);

        assert_eq!(board.counters(), Counters { left: 2, right: 0 });
    }

    #[test]
    fn test_decrement_saturates() {
        let mut counters = Counters::default();
        counters.apply(KeySlot::ADecrement);
        assert_eq!(counters.left, 0);
    }

    #[test]
    fn test_counters_persist() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryKvStore::new());
        let mut board = ScoreboardService::new(Arc::clone(&store)).unwrap();
        board.apply(KeySlot::BIncrement).unwrap();

        assert_eq!(ScoreboardService::new(Arc::clone(&store)).unwrap().counters().right, 1);
        board.reset().unwrap();
        assert_eq!(ScoreboardService::new(store).unwrap().counters(), Counters::default());
    }

    #[test]
    fn test_clock_and_counter_text() {
        let time = NaiveTime::from_hms_opt(9, 5, 7).unwrap();
        assert_eq!(clock_text(&time, true), "09:05:07");
        assert_eq!(clock_text(&time, false), "09:05");
        assert_eq!(format_counter(3), "03");
        assert_eq!(format_counter(120), "120");
    }

    #[test]
    fn test_modes() {
        assert!(ScoreboardMode::Embedded.requires_login());
        assert!(!ScoreboardMode::Embedded.alarms_enabled());
        assert!(ScoreboardMode::Standalone.alarms_enabled());
    }
}
