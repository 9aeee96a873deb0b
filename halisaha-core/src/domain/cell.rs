//! Grid cell coordinates and the cell key
//!
//! A cell is one (date, pitch, hour) slot in the booking grid. Its key is the
//! only lookup identity the reservation store knows about, so every caller
//! (grid, store, scoreboard alarms) must derive it through [`CellKey::new`].

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::result::{Error, Result};

/// Number of hour slots in a day
pub const HOURS_PER_DAY: u8 = 24;

/// Maximum number of pitches a facility can be configured with
pub const MAX_PITCHES: u8 = 6;

/// Date format used in cell keys and persisted records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the 24 bookable hour slots, rendered as `HH:00`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourSlot(u8);

impl HourSlot {
    pub fn new(hour: u8) -> Result<Self> {
        if hour >= HOURS_PER_DAY {
            return Err(Error::validation(format!(
                "hour must be between 0 and 23, got {}",
                hour
            )));
        }
        Ok(Self(hour))
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// The slot before this one, wrapping 00:00 back to 23:00
    pub fn previous(self) -> Self {
        Self((self.0 + HOURS_PER_DAY - 1) % HOURS_PER_DAY)
    }

    /// All 24 slots in display order
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (0..HOURS_PER_DAY).map(HourSlot)
    }
}

impl fmt::Display for HourSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for HourSlot {
    type Err = Error;

    /// Accepts `HH:00` as well as a bare hour (`9`, `18`)
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let hour_part = match s.split_once(':') {
            Some((hour, "00")) => hour,
            Some(_) => {
                return Err(Error::validation(format!(
                    "hour slot must be on the hour (HH:00), got '{}'",
                    s
                )))
            }
            None => s,
        };
        let hour: u8 = hour_part
            .parse()
            .map_err(|_| Error::validation(format!("invalid hour slot '{}'", s)))?;
        Self::new(hour)
    }
}

impl Serialize for HourSlot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HourSlot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Validate a zero-based pitch index against the configured pitch count
pub fn validate_pitch(pitch_index: u8, pitch_count: u8) -> Result<()> {
    validate_pitch_count(pitch_count)?;
    if pitch_index >= pitch_count {
        return Err(Error::validation(format!(
            "pitch {} does not exist (facility has {} pitch(es))",
            pitch_index + 1,
            pitch_count
        )));
    }
    Ok(())
}

/// Pitch count must be within 1..=6
pub fn validate_pitch_count(pitch_count: u8) -> Result<()> {
    if pitch_count == 0 || pitch_count > MAX_PITCHES {
        return Err(Error::validation(format!(
            "pitch count must be between 1 and {}, got {}",
            MAX_PITCHES, pitch_count
        )));
    }
    Ok(())
}

/// Coordinates of one grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub date: NaiveDate,
    pub pitch_index: u8,
    pub hour: HourSlot,
}

impl Cell {
    pub fn new(date: NaiveDate, pitch_index: u8, hour: HourSlot) -> Self {
        Self {
            date,
            pitch_index,
            hour,
        }
    }

    pub fn key(&self) -> CellKey {
        CellKey::new(self.date, self.pitch_index, self.hour)
    }

    /// This cell, if its pitch exists under `pitch_count`
    pub fn on_pitches(self, pitch_count: u8) -> Result<Self> {
        validate_pitch(self.pitch_index, pitch_count)?;
        Ok(self)
    }

    /// The cell one hour earlier on the same pitch, crossing midnight into
    /// the previous day
    pub fn previous_hour(&self) -> Self {
        let date = if self.hour.hour() == 0 {
            self.date.pred_opt().unwrap_or(self.date)
        } else {
            self.date
        };
        Self::new(date, self.pitch_index, self.hour.previous())
    }
}

/// Lookup identity of a reservation: `YYYY-MM-DD-<pitch>-HH:00`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellKey(String);

impl CellKey {
    pub fn new(date: NaiveDate, pitch_index: u8, hour: HourSlot) -> Self {
        Self(format!(
            "{}-{}-{}",
            date.format(DATE_FORMAT),
            pitch_index,
            hour
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the cell coordinates from a key string
    pub fn parse(raw: &str) -> Result<Cell> {
        let raw = raw.trim();
        let invalid = || Error::validation(format!("invalid cell key '{}'", raw));

        // The date part is always 10 characters (YYYY-MM-DD) followed by '-'.
        // An ASCII '-' at byte 10 makes both slices below land on boundaries.
        if raw.as_bytes().get(10) != Some(&b'-') {
            return Err(invalid());
        }
        let date = NaiveDate::parse_from_str(&raw[..10], DATE_FORMAT).map_err(|_| invalid())?;

        let (pitch, hour) = raw[11..].split_once('-').ok_or_else(invalid)?;
        if pitch.is_empty() || (pitch.len() > 1 && pitch.starts_with('0')) {
            return Err(invalid());
        }
        let pitch_index: u8 = pitch.parse().map_err(|_| invalid())?;

        // Keys always carry the zero-padded form
        if hour.len() != 5 {
            return Err(invalid());
        }
        let hour: HourSlot = hour.parse().map_err(|_| invalid())?;

        Ok(Cell::new(date, pitch_index, hour))
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&Cell> for CellKey {
    fn from(cell: &Cell) -> Self {
        cell.key()
    }
}

impl FromStr for CellKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::parse(s)?.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_key_format() {
        let key = CellKey::new(date("2025-03-10"), 1, HourSlot::new(18).unwrap());
        assert_eq!(key.as_str(), "2025-03-10-1-18:00");

        let key = CellKey::new(date("2025-03-11"), 2, HourSlot::new(9).unwrap());
        assert_eq!(key.as_str(), "2025-03-11-2-09:00");
    }

    #[test]
    fn test_keys_are_unique_per_cell() {
        let days = [date("2025-03-09"), date("2025-03-10"), date("2025-12-31")];
        let mut seen = HashSet::new();
        for day in days {
            for pitch in 0..MAX_PITCHES {
                for hour in HourSlot::all() {
                    assert!(seen.insert(CellKey::new(day, pitch, hour)));
                }
            }
        }
        assert_eq!(seen.len(), 3 * MAX_PITCHES as usize * 24);
    }

    #[test]
    fn test_parse_inverts_key() {
        let cell = Cell::new(date("2025-03-10"), 5, HourSlot::new(0).unwrap());
        assert_eq!(CellKey::parse(cell.key().as_str()).unwrap(), cell);
    }

    #[test]
    fn test_parse_rejects_malformed_keys() {
        assert!(CellKey::parse("2025-03-10-1-9:00").is_err());
        assert!(CellKey::parse("2025-03-10-01-09:00").is_err());
        assert!(CellKey::parse("2025-03-10-1-24:00").is_err());
        assert!(CellKey::parse("2025-3-10-1-09:00").is_err());
        assert!(CellKey::parse("garbage").is_err());
    }

    #[test]
    fn test_parse_rejects_multibyte_separator() {
        assert!(CellKey::parse("2025-03-10ş1-18:00").is_err());
        assert!(CellKey::parse("2025-03-1ş-1-18:00").is_err());
        assert!(CellKey::parse("2025-03-10-ş-18:00").is_err());
        assert!(CellKey::parse("ğğğğğğğğ").is_err());
    }

    #[test]
    fn test_hour_slot_parsing() {
        assert_eq!("18:00".parse::<HourSlot>().unwrap().hour(), 18);
        assert_eq!("7".parse::<HourSlot>().unwrap().to_string(), "07:00");
        assert!("18:30".parse::<HourSlot>().is_err());
        assert!("25".parse::<HourSlot>().is_err());
    }

    #[test]
    fn test_previous_hour_crosses_midnight() {
        let cell = Cell::new(date("2025-03-10"), 0, HourSlot::new(0).unwrap());
        let prev = cell.previous_hour();
        assert_eq!(prev.date, date("2025-03-09"));
        assert_eq!(prev.hour.to_string(), "23:00");

        let cell = Cell::new(date("2025-03-10"), 0, HourSlot::new(18).unwrap());
        assert_eq!(cell.previous_hour().key().as_str(), "2025-03-10-0-17:00");
    }

    #[test]
    fn test_pitch_validation() {
        assert!(validate_pitch(2, 3).is_ok());
        assert!(validate_pitch(3, 3).is_err());
        assert!(validate_pitch_count(0).is_err());
        assert!(validate_pitch_count(7).is_err());
    }

    #[test]
    fn test_parsed_key_must_fit_pitch_count() {
        let cell = CellKey::parse("2025-03-10-5-18:00").unwrap();
        assert!(cell.on_pitches(3).is_err());
        assert_eq!(cell.on_pitches(6).unwrap(), cell);

        let first = CellKey::parse("2025-03-10-0-18:00").unwrap();
        assert!(first.on_pitches(1).is_ok());
    }
}
