//! Reservation store - the cell key to reservation mapping
//!
//! At most one reservation lives under each cell key. The whole map is
//! written back to the key-value store after every mutating call.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{Cell, CellKey, Reservation, ReservationDraft};
use crate::ports::KeyValueStore;

use super::persisted::Persisted;

/// Storage key of the reservation map
pub const RESERVATIONS_KEY: &str = "reservations";

/// Reservations by cell key, persisted as an ordered list of `[key, record]`
/// pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationMap(BTreeMap<CellKey, Reservation>);

impl Serialize for ReservationMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<'de> Deserialize<'de> for ReservationMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pairs = Vec::<(CellKey, Reservation)>::deserialize(deserializer)?;
        Ok(Self(pairs.into_iter().collect()))
    }
}

/// Result of [`ReservationService::create`]
#[derive(Debug, Clone, PartialEq)]
pub enum CreateOutcome {
    Created(Reservation),
    /// The cell already holds this reservation; nothing was written
    Occupied(Reservation),
}

/// Result of [`ReservationService::update`]
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Reservation),
    /// No reservation under the key; the map is unchanged
    Missing,
}

/// Result of [`ReservationService::move_reservation`]
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    Moved {
        reservation: Reservation,
        /// Occupant of the target cell that was overwritten (replace only)
        replaced: Option<Reservation>,
    },
    SourceMissing,
    /// The target cell holds a different reservation; nothing moved
    Occupied(Reservation),
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub struct ReservationService {
    map: Persisted<ReservationMap>,
}

impl ReservationService {
    /// Hydrate the map from `store`, seeding an empty one on first use
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            map: Persisted::load(store, RESERVATIONS_KEY, ReservationMap::default)?,
        })
    }

    pub fn get(&self, key: &CellKey) -> Option<&Reservation> {
        self.map.get().0.get(key)
    }

    pub fn get_cell(&self, cell: &Cell) -> Option<&Reservation> {
        self.get(&cell.key())
    }

    /// Book an empty cell with a fresh id
    pub fn create(&mut self, draft: ReservationDraft) -> Result<CreateOutcome> {
        let key = draft.key();
        self.map.update(|map| match map.0.get(&key) {
            Some(existing) => CreateOutcome::Occupied(existing.clone()),
            None => {
                let reservation = draft.into_reservation(new_id());
                map.0.insert(key, reservation.clone());
                CreateOutcome::Created(reservation)
            }
        })
    }

    /// Book a cell, overwriting whatever is there
    ///
    /// Returns the new reservation and the one it replaced.
    pub fn create_or_replace(
        &mut self,
        draft: ReservationDraft,
    ) -> Result<(Reservation, Option<Reservation>)> {
        let key = draft.key();
        let reservation = draft.into_reservation(new_id());
        let stored = reservation.clone();
        let replaced = self.map.update(move |map| map.0.insert(key, stored))?;
        Ok((reservation, replaced))
    }

    /// Replace every field of the reservation under `key` except its id
    ///
    /// The draft must still describe the same cell; relocating is
    /// [`ReservationService::move_reservation`]'s job.
    pub fn update(&mut self, key: &CellKey, draft: ReservationDraft) -> Result<UpdateOutcome> {
        if draft.key() != *key {
            return Err(Error::validation(format!(
                "draft describes cell {} but update targets {}; use move to relocate",
                draft.key(),
                key
            )));
        }
        self.map.update(|map| match map.0.get_mut(key) {
            Some(existing) => {
                let id = std::mem::take(&mut existing.id);
                *existing = draft.into_reservation(id);
                UpdateOutcome::Updated(existing.clone())
            }
            None => UpdateOutcome::Missing,
        })
    }

    /// Remove the reservation under `key`, if any
    pub fn delete(&mut self, key: &CellKey) -> Result<Option<Reservation>> {
        self.map.update(|map| map.0.remove(key))
    }

    /// Relocate the reservation under `old_key` to `target`
    ///
    /// Id, user, status and notes travel unchanged. A different reservation
    /// at the target blocks the move unless `replace` is set.
    pub fn move_reservation(
        &mut self,
        old_key: &CellKey,
        target: Cell,
        replace: bool,
    ) -> Result<MoveOutcome> {
        let new_key = target.key();
        self.map.update(|map| {
            if !map.0.contains_key(old_key) {
                return MoveOutcome::SourceMissing;
            }
            if new_key != *old_key && !replace {
                if let Some(occupant) = map.0.get(&new_key) {
                    return MoveOutcome::Occupied(occupant.clone());
                }
            }

            let Some(mut reservation) = map.0.remove(old_key) else {
                return MoveOutcome::SourceMissing;
            };
            reservation.relocate(target);
            let replaced = map.0.insert(new_key, reservation.clone());
            MoveOutcome::Moved {
                reservation,
                replaced,
            }
        })
    }

    /// Re-read the map from storage, picking up writes from other processes
    pub fn reload(&mut self) -> Result<()> {
        self.map.reload()
    }

    /// Reservations on `date`, ordered by pitch then hour
    pub fn list_for_date(&self, date: NaiveDate) -> Vec<&Reservation> {
        let mut list: Vec<&Reservation> = self
            .map
            .get()
            .0
            .values()
            .filter(|r| r.date == date)
            .collect();
        list.sort_by_key(|r| (r.pitch_index, r.hour));
        list
    }

    pub fn len(&self) -> usize {
        self.map.get().0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.get().0.is_empty()
    }

    /// Stored (key, reservation) pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&CellKey, &Reservation)> {
        self.map.get().0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryKvStore;
    use crate::domain::{HourSlot, NewUser, ReservationStatus, User};

    fn store() -> Arc<dyn KeyValueStore> {
        Arc::new(MemoryKvStore::new())
    }

    fn mehmet() -> User {
        NewUser::new("Mehmet", "Ak", "054322148798").with_rating(5).into_user("1")
    }

    fn cell(date: &str, pitch: u8, hour: u8) -> Cell {
        Cell::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            pitch,
            HourSlot::new(hour).unwrap(),
        )
    }

    fn draft(c: Cell, status: ReservationStatus) -> ReservationDraft {
        ReservationDraft::new(c, mehmet(), status)
    }

    fn created(outcome: CreateOutcome) -> Reservation {
        match outcome {
            CreateOutcome::Created(r) => r,
            other => panic!("expected Created, got {:?}", other),
        }
    }

    /// Memory store whose writes start failing once `broken` is set
    #[derive(Default)]
    struct FlakyStore {
        inner: MemoryKvStore,
        broken: std::sync::atomic::AtomicBool,
    }

    impl FlakyStore {
        fn is_broken(&self) -> bool {
            self.broken.load(std::sync::atomic::Ordering::SeqCst)
        }
    }

    impl KeyValueStore for FlakyStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            if self.is_broken() {
                return Err(Error::database("disk full"));
            }
            self.inner.write(key, value)
        }

        fn remove(&self, key: &str) -> Result<()> {
            self.inner.remove(key)
        }

        fn keys(&self) -> Result<Vec<String>> {
            self.inner.keys()
        }
    }

    #[test]
    fn test_failed_write_leaves_mirror_untouched() {
        let flaky = Arc::new(FlakyStore::default());
        let mut service = ReservationService::new(flaky.clone()).unwrap();
        let booked = cell("2025-03-10", 0, 18);
        created(service.create(draft(booked, ReservationStatus::Hold)).unwrap());

        flaky.broken.store(true, std::sync::atomic::Ordering::SeqCst);
        let free = cell("2025-03-10", 1, 18);
        assert!(service.create(draft(free, ReservationStatus::Confirmed)).is_err());
        assert!(service.get(&free.key()).is_none());
        assert!(service.delete(&booked.key()).is_err());
        assert!(service.get(&booked.key()).is_some());
        assert_eq!(service.len(), 1);

        // Nothing half-written reached the store either
        service.reload().unwrap();
        assert!(service.get(&free.key()).is_none());
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_create_then_get() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 1, 18);

        let reservation = created(
            service
                .create(draft(c, ReservationStatus::Confirmed).with_notes("kale arkası"))
                .unwrap(),
        );

        let stored = service.get(&c.key()).unwrap();
        assert!(!stored.id.is_empty());
        assert_eq!(stored, &reservation);
        assert_eq!(stored.user.first_name, "Mehmet");
        assert_eq!(stored.notes.as_deref(), Some("kale arkası"));
        assert_eq!(c.key().as_str(), "2025-03-10-1-18:00");
    }

    #[test]
    fn test_create_into_occupied_cell_keeps_occupant() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 0, 20);
        let first = created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        match service.create(draft(c, ReservationStatus::Confirmed)).unwrap() {
            CreateOutcome::Occupied(existing) => assert_eq!(existing.id, first.id),
            other => panic!("expected Occupied, got {:?}", other),
        }
        assert_eq!(service.get(&c.key()).unwrap().status, ReservationStatus::Hold);
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_create_or_replace_overwrites() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 0, 20);
        let first = created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        let (second, replaced) = service
            .create_or_replace(draft(c, ReservationStatus::Tentative))
            .unwrap();

        assert_eq!(replaced.unwrap().id, first.id);
        assert_ne!(second.id, first.id);
        assert_eq!(service.get(&c.key()).unwrap().status, ReservationStatus::Tentative);
    }

    #[test]
    fn test_update_preserves_id() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 2, 9);
        let original = created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        let outcome = service
            .update(&c.key(), draft(c, ReservationStatus::Confirmed).with_notes("kapora alındı"))
            .unwrap();

        match outcome {
            UpdateOutcome::Updated(updated) => {
                assert_eq!(updated.id, original.id);
                assert_eq!(updated.status, ReservationStatus::Confirmed);
                assert_eq!(updated.notes.as_deref(), Some("kapora alındı"));
            }
            UpdateOutcome::Missing => panic!("expected Updated"),
        }
    }

    #[test]
    fn test_update_absent_key_is_noop() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 2, 9);

        let outcome = service.update(&c.key(), draft(c, ReservationStatus::Hold)).unwrap();
        assert_eq!(outcome, UpdateOutcome::Missing);
        assert!(service.is_empty());
    }

    #[test]
    fn test_update_rejects_drifting_draft() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 2, 9);
        created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        let elsewhere = cell("2025-03-10", 2, 10);
        let result = service.update(&c.key(), draft(elsewhere, ReservationStatus::Confirmed));

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(service.get(&c.key()).unwrap().status, ReservationStatus::Hold);
        assert!(service.get(&elsewhere.key()).is_none());
    }

    #[test]
    fn test_delete() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 0, 0);
        created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        assert!(service.delete(&c.key()).unwrap().is_some());
        assert!(service.get(&c.key()).is_none());
        assert!(service.delete(&c.key()).unwrap().is_none());
    }

    #[test]
    fn test_move_keeps_identity() {
        let mut service = ReservationService::new(store()).unwrap();
        let from = cell("2025-03-10", 1, 18);
        let original = created(
            service
                .create(draft(from, ReservationStatus::Confirmed).with_notes("not"))
                .unwrap(),
        );

        let to = cell("2025-03-11", 2, 9);
        let outcome = service.move_reservation(&from.key(), to, false).unwrap();

        let MoveOutcome::Moved { reservation, replaced } = outcome else {
            panic!("expected Moved");
        };
        assert!(replaced.is_none());
        assert!(service.get(&from.key()).is_none());
        assert_eq!(service.get(&to.key()), Some(&reservation));
        assert_eq!(reservation.id, original.id);
        assert_eq!(reservation.user, original.user);
        assert_eq!(reservation.status, original.status);
        assert_eq!(reservation.notes, original.notes);
        assert_eq!(reservation.pitch_index, 2);
        assert_eq!(reservation.key().as_str(), "2025-03-11-2-09:00");
    }

    #[test]
    fn test_move_onto_itself_is_in_place() {
        let mut service = ReservationService::new(store()).unwrap();
        let c = cell("2025-03-10", 1, 18);
        let original = created(service.create(draft(c, ReservationStatus::Hold)).unwrap());

        let outcome = service.move_reservation(&c.key(), c, false).unwrap();

        assert_eq!(
            outcome,
            MoveOutcome::Moved {
                reservation: original.clone(),
                replaced: None
            }
        );
        assert_eq!(service.len(), 1);
        assert_eq!(service.get(&c.key()).unwrap().id, original.id);
    }

    #[test]
    fn test_move_missing_source() {
        let mut service = ReservationService::new(store()).unwrap();
        let outcome = service
            .move_reservation(&cell("2025-03-10", 0, 1).key(), cell("2025-03-10", 0, 2), false)
            .unwrap();
        assert_eq!(outcome, MoveOutcome::SourceMissing);
        assert!(service.is_empty());
    }

    #[test]
    fn test_move_onto_occupied_cell() {
        let mut service = ReservationService::new(store()).unwrap();
        let a = cell("2025-03-10", 0, 18);
        let b = cell("2025-03-10", 0, 19);
        let first = created(service.create(draft(a, ReservationStatus::Hold)).unwrap());
        let second = created(service.create(draft(b, ReservationStatus::Confirmed)).unwrap());

        match service.move_reservation(&a.key(), b, false).unwrap() {
            MoveOutcome::Occupied(occupant) => assert_eq!(occupant.id, second.id),
            other => panic!("expected Occupied, got {:?}", other),
        }
        assert_eq!(service.len(), 2);

        let MoveOutcome::Moved { reservation, replaced } =
            service.move_reservation(&a.key(), b, true).unwrap()
        else {
            panic!("expected Moved");
        };
        assert_eq!(reservation.id, first.id);
        assert_eq!(replaced.unwrap().id, second.id);
        assert_eq!(service.len(), 1);
    }

    #[test]
    fn test_map_persists_as_pairs() {
        let kv = store();
        let mut service = ReservationService::new(Arc::clone(&kv)).unwrap();
        let c = cell("2025-03-10", 1, 18);
        created(service.create(draft(c, ReservationStatus::Confirmed)).unwrap());

        let raw = kv.read(RESERVATIONS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0][0], "2025-03-10-1-18:00");
        assert_eq!(value[0][1]["status"], "kesin");

        let reopened = ReservationService::new(kv).unwrap();
        assert_eq!(reopened.get(&c.key()), service.get(&c.key()));
    }

    #[test]
    fn test_list_for_date_orders_by_pitch_then_hour() {
        let mut service = ReservationService::new(store()).unwrap();
        for c in [
            cell("2025-03-10", 1, 9),
            cell("2025-03-10", 0, 20),
            cell("2025-03-10", 0, 8),
            cell("2025-03-11", 0, 8),
        ] {
            created(service.create(draft(c, ReservationStatus::Hold)).unwrap());
        }

        let keys: Vec<String> = service
            .list_for_date(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
            .iter()
            .map(|r| r.key().to_string())
            .collect();
        assert_eq!(
            keys,
            vec!["2025-03-10-0-08:00", "2025-03-10-0-20:00", "2025-03-10-1-09:00"]
        );
    }
}
