//! Day grid - 24 hour rows by N pitch columns

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::domain::cell::validate_pitch_count;
use crate::domain::result::Result;
use crate::domain::{Cell, CellKey, HourSlot, ReservationStatus};

use super::reservation::ReservationService;

/// Date navigation in the grid header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateStep {
    PreviousWeek,
    PreviousDay,
    Today,
    NextDay,
    NextWeek,
}

impl DateStep {
    pub fn apply(self, date: NaiveDate, today: NaiveDate) -> NaiveDate {
        let days = match self {
            DateStep::PreviousWeek => -7,
            DateStep::PreviousDay => -1,
            DateStep::Today => return today,
            DateStep::NextDay => 1,
            DateStep::NextWeek => 7,
        };
        date.checked_add_signed(Duration::days(days)).unwrap_or(date)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    pub key: CellKey,
    pub pitch_index: u8,
    pub status: Option<ReservationStatus>,
    /// Occupant full name
    pub occupant: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub hour: HourSlot,
    pub cells: Vec<GridCell>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayGrid {
    pub date: NaiveDate,
    pub pitch_count: u8,
    pub rows: Vec<GridRow>,
}

impl DayGrid {
    pub fn booked(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .filter(|c| c.status.is_some())
            .count()
    }
}

/// Build the grid for `date` with every cell resolved against the store
pub fn day_grid(
    date: NaiveDate,
    pitch_count: u8,
    reservations: &ReservationService,
) -> Result<DayGrid> {
    validate_pitch_count(pitch_count)?;

    let rows = HourSlot::all()
        .map(|hour| GridRow {
            hour,
            cells: (0..pitch_count)
                .map(|pitch_index| {
                    let key = Cell::new(date, pitch_index, hour).key();
                    let reservation = reservations.get(&key);
                    GridCell {
                        pitch_index,
                        status: reservation.map(|r| r.status),
                        occupant: reservation.map(|r| r.user.full_name()),
                        key,
                    }
                })
                .collect(),
        })
        .collect();

    Ok(DayGrid {
        date,
        pitch_count,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKvStore;
    use crate::domain::{NewUser, ReservationDraft};
    use std::sync::Arc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_grid_shape_and_occupants() {
        let mut reservations = ReservationService::new(Arc::new(MemoryKvStore::new())).unwrap();
        let user = NewUser::new("Art", "Bir", "054312345670").into_user("2");
        let cell = Cell::new(date("2025-03-10"), 2, HourSlot::new(21).unwrap());
        reservations
            .create(ReservationDraft::new(cell, user, ReservationStatus::Tentative))
            .unwrap();

        let grid = day_grid(date("2025-03-10"), 3, &reservations).unwrap();

        assert_eq!(grid.rows.len(), 24);
        assert!(grid.rows.iter().all(|r| r.cells.len() == 3));
        let booked = &grid.rows[21].cells[2];
        assert_eq!(booked.key.as_str(), "2025-03-10-2-21:00");
        assert_eq!(booked.status, Some(ReservationStatus::Tentative));
        assert_eq!(booked.occupant.as_deref(), Some("Art Bir"));
        assert_eq!(grid.booked(), 1);
    }

    #[test]
    fn test_pitch_count_is_validated() {
        let reservations = ReservationService::new(Arc::new(MemoryKvStore::new())).unwrap();
        assert!(day_grid(date("2025-03-10"), 0, &reservations).is_err());
        assert!(day_grid(date("2025-03-10"), 7, &reservations).is_err());
        assert_eq!(day_grid(date("2025-03-10"), 6, &reservations).unwrap().rows[0].cells.len(), 6);
    }

    #[test]
    fn test_date_steps() {
        let today = date("2025-03-10");
        let shown = date("2025-02-28");
        assert_eq!(DateStep::NextDay.apply(shown, today), date("2025-03-01"));
        assert_eq!(DateStep::PreviousWeek.apply(shown, today), date("2025-02-21"));
        assert_eq!(DateStep::NextWeek.apply(shown, today), date("2025-03-07"));
        assert_eq!(DateStep::Today.apply(shown, today), today);
    }
}
