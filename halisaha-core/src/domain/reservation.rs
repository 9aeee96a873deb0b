//! Reservation domain model

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::cell::{Cell, CellKey, HourSlot};
use super::result::{Error, Result};
use super::user::User;

/// Booking firmness label
///
/// Persisted with the facility's own labels ("beklet", "ön", "kesin") so
/// existing data stays readable. There is no enforced transition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[serde(rename = "beklet")]
    Hold,
    #[serde(rename = "ön")]
    Tentative,
    #[serde(rename = "kesin")]
    Confirmed,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 3] = [
        ReservationStatus::Hold,
        ReservationStatus::Tentative,
        ReservationStatus::Confirmed,
    ];

    /// Persisted label
    pub fn code(&self) -> &'static str {
        match self {
            ReservationStatus::Hold => "beklet",
            ReservationStatus::Tentative => "ön",
            ReservationStatus::Confirmed => "kesin",
        }
    }

    /// Label shown on the editor buttons
    pub fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Hold => "Beklet",
            ReservationStatus::Tentative => "Ön Rez.",
            ReservationStatus::Confirmed => "Kesin Rez.",
        }
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ReservationStatus {
    type Err = Error;

    /// Accepts the persisted labels as well as English names
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "beklet" | "hold" => Ok(ReservationStatus::Hold),
            "ön" | "on" | "tentative" => Ok(ReservationStatus::Tentative),
            "kesin" | "confirmed" => Ok(ReservationStatus::Confirmed),
            other => Err(Error::validation(format!(
                "unknown status '{}' (expected hold, tentative or confirmed)",
                other
            ))),
        }
    }
}

/// A booking occupying exactly one cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub date: NaiveDate,
    pub hour: HourSlot,
    pub pitch_index: u8,
    /// Snapshot of the user at booking time
    pub user: User,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Reservation {
    pub fn cell(&self) -> Cell {
        Cell::new(self.date, self.pitch_index, self.hour)
    }

    /// Key derived from the record's own coordinates
    pub fn key(&self) -> CellKey {
        self.cell().key()
    }

    pub(crate) fn relocate(&mut self, cell: Cell) {
        self.date = cell.date;
        self.hour = cell.hour;
        self.pitch_index = cell.pitch_index;
    }
}

/// Everything a reservation carries except its id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationDraft {
    pub date: NaiveDate,
    pub hour: HourSlot,
    pub pitch_index: u8,
    pub user: User,
    pub status: ReservationStatus,
    pub notes: Option<String>,
}

impl ReservationDraft {
    pub fn new(cell: Cell, user: User, status: ReservationStatus) -> Self {
        Self {
            date: cell.date,
            hour: cell.hour,
            pitch_index: cell.pitch_index,
            user,
            status,
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.date, self.pitch_index, self.hour)
    }

    pub fn key(&self) -> CellKey {
        self.cell().key()
    }

    pub fn into_reservation(self, id: impl Into<String>) -> Reservation {
        Reservation {
            id: id.into(),
            date: self.date,
            hour: self.hour,
            pitch_index: self.pitch_index,
            user: self.user,
            status: self.status,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::NewUser;

    #[test]
    fn test_status_codes_round_trip_through_json() {
        let json = serde_json::to_string(&ReservationStatus::ALL).unwrap();
        assert_eq!(json, r#"["beklet","ön","kesin"]"#);
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("kesin".parse::<ReservationStatus>().unwrap(), ReservationStatus::Confirmed);
        assert_eq!("Hold".parse::<ReservationStatus>().unwrap(), ReservationStatus::Hold);
        assert_eq!("ön".parse::<ReservationStatus>().unwrap(), ReservationStatus::Tentative);
        assert!("cancelled".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_reservation_json_shape() {
        let cell = CellKey::parse("2025-03-10-1-18:00").unwrap();
        let user = NewUser::new("Mehmet", "Ak", "054322148798").into_user("1");
        let reservation = ReservationDraft::new(cell, user, ReservationStatus::Confirmed)
            .into_reservation("abc");

        let json = serde_json::to_value(&reservation).unwrap();
        assert_eq!(json["date"], "2025-03-10");
        assert_eq!(json["hour"], "18:00");
        assert_eq!(json["pitchIndex"], 1);
        assert_eq!(json["status"], "kesin");
        assert_eq!(json["user"]["firstName"], "Mehmet");
        assert_eq!(reservation.key().as_str(), "2025-03-10-1-18:00");
    }
}
