//! Doctor service - integrity checks over the persisted data

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::json;

use crate::domain::DisplaySettings;

use super::auth::SESSION_KEY;
use super::directory::{UserDirectory, USERS_KEY};
use super::reservation::{ReservationService, RESERVATIONS_KEY};
use super::scoreboard::COUNTERS_KEY;
use super::settings::DISPLAY_SETTINGS_KEY;

const PASS: &str = "pass";
const WARNING: &str = "warning";
const ERROR: &str = "error";

const KNOWN_KEYS: [&str; 5] = [
    RESERVATIONS_KEY,
    USERS_KEY,
    SESSION_KEY,
    DISPLAY_SETTINGS_KEY,
    COUNTERS_KEY,
];

/// Stateless: every check reads the services it is handed
#[derive(Debug, Default)]
pub struct DoctorService;

impl DoctorService {
    pub fn new() -> Self {
        Self
    }

    pub fn run_checks(
        &self,
        reservations: &ReservationService,
        users: &UserDirectory,
        settings: &DisplaySettings,
        stored_keys: &[String],
    ) -> DoctorResult {
        let mut checks = BTreeMap::new();

        // Stored key must be the key derived from the record's coordinates
        let drifted: Vec<serde_json::Value> = reservations
            .iter()
            .filter(|(key, r)| r.key() != **key)
            .map(|(key, r)| {
                json!({
                    "stored_key": key.as_str(),
                    "derived_key": r.key().as_str(),
                    "reservation_id": r.id,
                })
            })
            .collect();
        checks.insert(
            "key_integrity".to_string(),
            CheckResult::from_findings(
                drifted,
                ERROR,
                "Every reservation is stored under its own cell key".to_string(),
                |n| format!("{} reservation(s) stored under a key that does not match their cell", n),
            ),
        );

        let out_of_range: Vec<serde_json::Value> = reservations
            .iter()
            .filter(|(_, r)| r.pitch_index >= settings.pitch_count)
            .map(|(key, r)| json!({ "key": key.as_str(), "pitch": r.pitch_index + 1 }))
            .collect();
        checks.insert(
            "pitch_bounds".to_string(),
            CheckResult::from_findings(
                out_of_range,
                WARNING,
                format!("All reservations fit the {} configured pitch(es)", settings.pitch_count),
                |n| {
                    format!(
                        "{} reservation(s) are on pitches hidden by the current pitch count ({})",
                        n, settings.pitch_count
                    )
                },
            ),
        );

        // Snapshots are expected to diverge over time; this is informational
        let stale: Vec<serde_json::Value> = reservations
            .iter()
            .filter(|(_, r)| users.find(&r.user.id) != Some(&r.user))
            .map(|(key, r)| {
                json!({
                    "key": key.as_str(),
                    "user_id": r.user.id,
                    "in_directory": users.find(&r.user.id).is_some(),
                })
            })
            .collect();
        checks.insert(
            "user_snapshots".to_string(),
            CheckResult::from_findings(
                stale,
                WARNING,
                "Reservation user copies match the directory".to_string(),
                |n| format!("{} reservation(s) carry a user copy that differs from the directory", n),
            ),
        );

        let mut id_counts: HashMap<&str, usize> = HashMap::new();
        for user in users.list() {
            *id_counts.entry(user.id.as_str()).or_default() += 1;
        }
        let mut duplicate_ids: Vec<(&str, usize)> =
            id_counts.into_iter().filter(|(_, n)| *n > 1).collect();
        duplicate_ids.sort();
        let duplicate_ids: Vec<serde_json::Value> = duplicate_ids
            .into_iter()
            .map(|(id, count)| json!({ "user_id": id, "count": count }))
            .collect();
        checks.insert(
            "directory_ids".to_string(),
            CheckResult::from_findings(
                duplicate_ids,
                ERROR,
                "User ids are unique".to_string(),
                |n| format!("{} user id(s) are shared by more than one user", n),
            ),
        );

        // Anything else in sys_kv was written by something other than this app
        let unknown: Vec<serde_json::Value> = stored_keys
            .iter()
            .filter(|key| !KNOWN_KEYS.contains(&key.as_str()))
            .map(|key| json!({ "key": key }))
            .collect();
        checks.insert(
            "store_entries".to_string(),
            CheckResult::from_findings(
                unknown,
                WARNING,
                "The store holds only booking desk entries".to_string(),
                |n| format!("{} unknown entr(ies) in the store", n),
            ),
        );

        let passed = checks.values().filter(|c| c.status == PASS).count() as i64;
        let warnings = checks.values().filter(|c| c.status == WARNING).count() as i64;
        let errors = checks.values().filter(|c| c.status == ERROR).count() as i64;

        DoctorResult {
            checks,
            summary: DoctorSummary {
                passed,
                warnings,
                errors,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorResult {
    pub checks: BTreeMap<String, CheckResult>,
    pub summary: DoctorSummary,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub status: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<serde_json::Value>>,
}

impl CheckResult {
    fn from_findings(
        findings: Vec<serde_json::Value>,
        severity: &str,
        pass_message: String,
        fail_message: impl FnOnce(usize) -> String,
    ) -> Self {
        if findings.is_empty() {
            Self {
                status: PASS.to_string(),
                message: pass_message,
                details: None,
            }
        } else {
            Self {
                status: severity.to_string(),
                message: fail_message(findings.len()),
                details: Some(findings),
            }
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DoctorSummary {
    pub passed: i64,
    pub warnings: i64,
    pub errors: i64,
}
