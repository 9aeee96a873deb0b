//! Integration tests for halisaha-core
//!
//! These run the full context against a real DuckDB file in a temp dir.
//!
//! Run with: cargo test --test integration_tests -- --nocapture

use std::sync::Arc;

use chrono::NaiveDate;
use tempfile::TempDir;

use halisaha_core::adapters::duckdb::DuckDbKvStore;
use halisaha_core::config::Config;
use halisaha_core::ports::KeyValueStore;
use halisaha_core::services::{
    day_grid, AlarmCue, AlarmEvaluator, CreateOutcome, MoveOutcome, UpdateOutcome,
};
use halisaha_core::{Cell, CellKey, HalisahaContext, HourSlot, ReservationDraft, ReservationStatus};

// ============================================================================
// Test Helpers
// ============================================================================

fn open_context(temp_dir: &TempDir) -> HalisahaContext {
    HalisahaContext::new(temp_dir.path()).expect("Failed to open context")
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn cell(day: &str, pitch: u8, hour: u8) -> Cell {
    Cell::new(date(day), pitch, HourSlot::new(hour).unwrap())
}

// ============================================================================
// Reservation lifecycle
// ============================================================================

/// Create, then move to another day and pitch
#[test]
fn test_create_then_move_across_days() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    let mehmet = ctx.users.find("1").unwrap().clone();

    let created = match ctx
        .reservations
        .create(ReservationDraft::new(
            cell("2025-03-10", 1, 18),
            mehmet.clone(),
            ReservationStatus::Confirmed,
        ))
        .unwrap()
    {
        CreateOutcome::Created(r) => r,
        other => panic!("expected Created, got {:?}", other),
    };
    assert_eq!(created.key().as_str(), "2025-03-10-1-18:00");

    let old_key: CellKey = "2025-03-10-1-18:00".parse().unwrap();
    let outcome = ctx
        .reservations
        .move_reservation(&old_key, cell("2025-03-11", 2, 9), false)
        .unwrap();

    let MoveOutcome::Moved { reservation, .. } = outcome else {
        panic!("expected Moved, got {:?}", outcome);
    };
    assert!(ctx.reservations.get(&old_key).is_none());
    assert_eq!(reservation.key().as_str(), "2025-03-11-2-09:00");
    assert_eq!(reservation.pitch_index, 2);
    assert_eq!(reservation.id, created.id);
    assert_eq!(reservation.user, mehmet);
}

/// Everything written through one context is visible after reopening
#[test]
fn test_data_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let key;
    {
        let mut ctx = open_context(&temp_dir);
        assert!(ctx.auth.login("0-532-214-87-98", "123456").unwrap());
        ctx.settings.set_pitch_count(5).unwrap();
        let art = ctx.users.find("2").unwrap().clone();
        let c = cell("2025-06-01", 4, 21);
        key = c.key();
        ctx.reservations
            .create(ReservationDraft::new(c, art, ReservationStatus::Tentative).with_notes("Kapora yok"))
            .unwrap();
    }

    let ctx = open_context(&temp_dir);
    assert!(ctx.auth.is_authenticated());
    assert_eq!(ctx.settings.get().pitch_count, 5);
    assert_eq!(ctx.users.list().len(), 2);

    let stored = ctx.reservations.get(&key).unwrap();
    assert_eq!(stored.status, ReservationStatus::Tentative);
    assert_eq!(stored.notes.as_deref(), Some("Kapora yok"));
    assert_eq!(stored.user.full_name(), "Art Bir");
}

/// A second booking for a taken cell is refused; replace overwrites
#[test]
fn test_occupied_cell_is_protected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    let mehmet = ctx.users.find("1").unwrap().clone();
    let art = ctx.users.find("2").unwrap().clone();
    let c = cell("2025-03-10", 0, 20);

    ctx.reservations
        .create(ReservationDraft::new(c, mehmet.clone(), ReservationStatus::Hold))
        .unwrap();
    let outcome = ctx
        .reservations
        .create(ReservationDraft::new(c, art.clone(), ReservationStatus::Confirmed))
        .unwrap();

    assert!(matches!(outcome, CreateOutcome::Occupied(ref r) if r.user == mehmet));
    assert_eq!(ctx.reservations.get(&c.key()).unwrap().user, mehmet);

    let (_, replaced) = ctx
        .reservations
        .create_or_replace(ReservationDraft::new(c, art.clone(), ReservationStatus::Confirmed))
        .unwrap();
    assert_eq!(replaced.unwrap().user, mehmet);
    assert_eq!(ctx.reservations.get(&c.key()).unwrap().user, art);
}

/// Update keeps the id; updating an empty cell changes nothing on disk
#[test]
fn test_update_and_delete_round_trip_through_disk() {
    let temp_dir = TempDir::new().unwrap();
    let c = cell("2025-03-10", 2, 9);
    let original_id = {
        let mut ctx = open_context(&temp_dir);
        let user = ctx.users.find("1").unwrap().clone();
        let CreateOutcome::Created(r) = ctx
            .reservations
            .create(ReservationDraft::new(c, user.clone(), ReservationStatus::Hold))
            .unwrap()
        else {
            panic!("cell should be free");
        };
        let missing = ctx
            .reservations
            .update(
                &cell("2025-03-10", 2, 10).key(),
                ReservationDraft::new(cell("2025-03-10", 2, 10), user, ReservationStatus::Hold),
            )
            .unwrap();
        assert_eq!(missing, UpdateOutcome::Missing);
        r.id
    };

    {
        let mut ctx = open_context(&temp_dir);
        assert_eq!(ctx.reservations.len(), 1);
        let user = ctx.users.find("2").unwrap().clone();
        let updated = ctx
            .reservations
            .update(&c.key(), ReservationDraft::new(c, user, ReservationStatus::Confirmed))
            .unwrap();
        let UpdateOutcome::Updated(updated) = updated else {
            panic!("expected Updated");
        };
        assert_eq!(updated.id, original_id);
    }

    let mut ctx = open_context(&temp_dir);
    assert_eq!(ctx.reservations.get(&c.key()).unwrap().status, ReservationStatus::Confirmed);
    assert!(ctx.reservations.delete(&c.key()).unwrap().is_some());
    assert!(ctx.reservations.delete(&c.key()).unwrap().is_none());
    assert!(open_context(&temp_dir).reservations.is_empty());
}

// ============================================================================
// Grid and alarms
// ============================================================================

/// Booking at 17:00 only: 18:00 ends the match, 18:10 warns, other minutes stay quiet
#[test]
fn test_alarm_sequence_against_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    let user = ctx.users.find("1").unwrap().clone();
    ctx.reservations
        .create(ReservationDraft::new(cell("2025-03-10", 1, 17), user, ReservationStatus::Confirmed))
        .unwrap();

    let day = date("2025-03-10");
    let mut evaluator = AlarmEvaluator::new();
    let mut fired = Vec::new();
    for (minute, second) in [(0, 0), (0, 1), (0, 0), (5, 0), (10, 0), (30, 0), (45, 0)] {
        let now = day.and_hms_opt(18, minute, second).unwrap();
        if let Some(cue) = evaluator.tick_with_store(now, 1, &ctx.reservations) {
            fired.push((minute, cue));
        }
    }

    assert_eq!(fired, vec![(0, AlarmCue::End), (10, AlarmCue::TenMinutesAfter)]);
}

/// The grid reads the same keys the store writes
#[test]
fn test_grid_reflects_store() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = open_context(&temp_dir);
    let user = ctx.users.find("2").unwrap().clone();
    ctx.reservations
        .create(ReservationDraft::new(cell("2025-03-10", 0, 8), user, ReservationStatus::Hold))
        .unwrap();

    let grid = day_grid(date("2025-03-10"), ctx.settings.get().pitch_count, &ctx.reservations).unwrap();
    assert_eq!(grid.rows[8].cells[0].occupant.as_deref(), Some("Art Bir"));
    assert_eq!(grid.booked(), 1);

    let next_day = day_grid(date("2025-03-11"), 3, &ctx.reservations).unwrap();
    assert_eq!(next_day.booked(), 0);
}

// ============================================================================
// Store and config plumbing
// ============================================================================

/// A second context on the same file sees writes from the first after reload
#[test]
fn test_reload_picks_up_other_writer() {
    let temp_dir = TempDir::new().unwrap();
    let mut desk = open_context(&temp_dir);
    let mut board = open_context(&temp_dir);

    let user = desk.users.find("1").unwrap().clone();
    desk.reservations
        .create(ReservationDraft::new(cell("2025-03-10", 0, 18), user, ReservationStatus::Confirmed))
        .unwrap();

    assert!(board.reservations.is_empty());
    board.reload().unwrap();
    assert_eq!(board.reservations.len(), 1);
}

const DESK_CHILD_DIR: &str = "HALISAHA_TEST_DESK_DIR";

/// Runs only when re-executed by `test_desk_process_books_while_board_is_open`
#[test]
fn desk_process_child() {
    let Ok(dir) = std::env::var(DESK_CHILD_DIR) else {
        return;
    };
    let mut desk = HalisahaContext::new(std::path::Path::new(&dir)).unwrap();
    let user = desk.users.find("2").unwrap().clone();
    let outcome = desk
        .reservations
        .create(ReservationDraft::new(cell("2025-03-10", 2, 21), user, ReservationStatus::Hold))
        .unwrap();
    assert!(matches!(outcome, CreateOutcome::Created(_)));
}

/// A board context stays alive while another process books a cell
#[test]
fn test_desk_process_books_while_board_is_open() {
    if std::env::var(DESK_CHILD_DIR).is_ok() {
        return;
    }
    let temp_dir = TempDir::new().unwrap();
    let mut board = open_context(&temp_dir);
    board.scoreboard.reset().unwrap();

    let output = std::process::Command::new(std::env::current_exe().unwrap())
        .args(["--exact", "desk_process_child", "--test-threads=1"])
        .env(DESK_CHILD_DIR, temp_dir.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "desk process failed: {}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    board.reload().unwrap();
    let booked = board.reservations.get(&cell("2025-03-10", 2, 21).key()).unwrap();
    assert_eq!(booked.user.full_name(), "Art Bir");
}

/// Two store handles on one file see each other's writes
#[test]
fn test_store_handles_share_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("shared.duckdb");
    let first: Arc<dyn KeyValueStore> = Arc::new(DuckDbKvStore::open(&db_path).unwrap());
    let second = DuckDbKvStore::open(&db_path).unwrap();

    second.write("notes", "\"Kapora yok\"").unwrap();
    let board = HalisahaContext::with_store(Config::default(), first).unwrap();
    assert_eq!(board.store.read("notes").unwrap().as_deref(), Some("\"Kapora yok\""));
}

/// settings.json switches the context into standalone scoreboard mode
#[test]
fn test_scoreboard_only_from_settings_file() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"scoreboardOnly": true, "facilityName": "Kuzey Saha"}}"#,
    )
    .unwrap();

    let ctx = open_context(&temp_dir);
    if std::env::var("HALISAHA_SCOREBOARD").is_err() {
        assert!(ctx.scoreboard_mode().alarms_enabled());
    }
    assert_eq!(ctx.config.facility_name, "Kuzey Saha");
}

/// Doctor and status run clean on a fresh store
#[test]
fn test_fresh_store_is_healthy() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = open_context(&temp_dir);

    let report = ctx.doctor().unwrap();
    assert_eq!(report.summary.errors, 0);
    assert_eq!(report.summary.warnings, 0);

    let status = ctx.status();
    assert_eq!(status.total_users, 2);
    assert_eq!(status.total_reservations, 0);
}
