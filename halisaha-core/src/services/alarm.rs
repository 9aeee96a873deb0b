//! Scoreboard alarm rules
//!
//! Once per wall-clock minute (at second 0) the evaluator looks at the
//! watched pitch's previous-hour and current-hour cells and decides whether
//! to sound a cue:
//!
//! | minute | previous | current  | cue             |
//! |--------|----------|----------|-----------------|
//! | 0      | booked   | booked   | EndWithNext     |
//! | 0      | booked   | empty    | End             |
//! | 10     | booked   | empty    | TenMinutesAfter |
//! | 30     | any      | booked   | ThirtyMinutesIn |

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::domain::{Cell, CellKey, HourSlot};

use super::reservation::ReservationService;

/// Silence between two pulses of the same cue
pub const PULSE_GAP_MS: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlarmCue {
    /// A match ended and the pitch is free
    End,
    /// A match ended and the next one starts now
    EndWithNext,
    /// The previous team is still on a free pitch ten minutes later
    TenMinutesAfter,
    /// Half time of the current match
    ThirtyMinutesIn,
}

impl AlarmCue {
    /// Stable name for logs and JSON
    pub fn code(&self) -> &'static str {
        match self {
            AlarmCue::End => "end",
            AlarmCue::EndWithNext => "end_with_next",
            AlarmCue::TenMinutesAfter => "ten_minutes_after",
            AlarmCue::ThirtyMinutesIn => "thirty_minutes_in",
        }
    }

    pub fn pulses(&self) -> u8 {
        match self {
            AlarmCue::End => 1,
            AlarmCue::EndWithNext => 3,
            AlarmCue::TenMinutesAfter => 3,
            AlarmCue::ThirtyMinutesIn => 2,
        }
    }

    pub fn frequency_hz(&self) -> u32 {
        match self {
            AlarmCue::End | AlarmCue::EndWithNext => 800,
            AlarmCue::TenMinutesAfter => 1000,
            AlarmCue::ThirtyMinutesIn => 600,
        }
    }

    pub fn tone_ms(&self) -> u64 {
        match self {
            AlarmCue::End | AlarmCue::EndWithNext => 300,
            AlarmCue::TenMinutesAfter => 500,
            AlarmCue::ThirtyMinutesIn => 400,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AlarmCue::End => "Maç bitti",
            AlarmCue::EndWithNext => "Maç bitti, sıradaki maç başlıyor",
            AlarmCue::TenMinutesAfter => "Maç biteli 10 dakika oldu",
            AlarmCue::ThirtyMinutesIn => "Maçın 30. dakikası",
        }
    }
}

/// Minute-tick alarm state for one scoreboard
#[derive(Debug, Default)]
pub struct AlarmEvaluator {
    last_checked: Option<(u32, u32)>,
}

impl AlarmEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate the rules for `now` on `pitch_index`
    ///
    /// `occupied` reports whether a cell key holds a reservation. Returns
    /// `None` off second 0 and for a minute that was already evaluated.
    pub fn tick(
        &mut self,
        now: NaiveDateTime,
        pitch_index: u8,
        occupied: impl Fn(&CellKey) -> bool,
    ) -> Option<AlarmCue> {
        if now.second() != 0 {
            return None;
        }
        let minute_key = (now.hour(), now.minute());
        if self.last_checked == Some(minute_key) {
            return None;
        }
        self.last_checked = Some(minute_key);

        let hour = HourSlot::new(now.hour() as u8).ok()?;
        let current = Cell::new(now.date(), pitch_index, hour);
        let previous_booked = occupied(&current.previous_hour().key());
        let current_booked = occupied(&current.key());

        match now.minute() {
            0 if previous_booked && current_booked => Some(AlarmCue::EndWithNext),
            0 if previous_booked => Some(AlarmCue::End),
            10 if previous_booked && !current_booked => Some(AlarmCue::TenMinutesAfter),
            30 if current_booked => Some(AlarmCue::ThirtyMinutesIn),
            _ => None,
        }
    }

    /// [`AlarmEvaluator::tick`] against the reservation store
    pub fn tick_with_store(
        &mut self,
        now: NaiveDateTime,
        pitch_index: u8,
        reservations: &ReservationService,
    ) -> Option<AlarmCue> {
        self.tick(now, pitch_index, |key| reservations.get(key).is_some())
    }
}
