//! Configuration management
//!
//! `settings.json` in the data directory:
//! ```json
//! {
//!   "app": { "facilityName": "Efeler Park Halısaha", "scoreboardOnly": false }
//! }
//! ```
//! Display preferences are not here; they live in the key-value store.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Facility name shown in headers when none is configured
pub const DEFAULT_FACILITY_NAME: &str = "Efeler Park Halısaha";

/// Environment override for standalone scoreboard mode
pub const SCOREBOARD_ENV: &str = "HALISAHA_SCOREBOARD";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    facility_name: Option<String>,
    #[serde(default)]
    scoreboard_only: bool,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Parse a boolean environment flag; `None` when unset or unrecognised
fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value {
        Some("true" | "1" | "yes" | "TRUE" | "YES") => Some(true),
        Some("false" | "0" | "no" | "FALSE" | "NO") => Some(false),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub facility_name: String,
    /// Standalone scoreboard: no login, alarms on, bookings read-only
    pub scoreboard_only: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            facility_name: DEFAULT_FACILITY_NAME.to_string(),
            scoreboard_only: false,
        }
    }
}

impl Config {
    /// Load config from the data directory
    ///
    /// Scoreboard-only mode comes from `HALISAHA_SCOREBOARD` when set, else
    /// from the settings file.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let raw = Self::read_settings(data_dir)?;
        let env = std::env::var(SCOREBOARD_ENV).ok();
        Ok(Self::from_settings(raw, env.as_deref()))
    }

    fn from_settings(raw: SettingsFile, scoreboard_env: Option<&str>) -> Self {
        let facility_name = raw
            .app
            .facility_name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FACILITY_NAME.to_string());
        Self {
            facility_name,
            scoreboard_only: parse_flag(scoreboard_env).unwrap_or(raw.app.scoreboard_only),
        }
    }

    fn read_settings(data_dir: &Path) -> Result<SettingsFile> {
        let settings_path = data_dir.join("settings.json");
        if !settings_path.exists() {
            return Ok(SettingsFile::default());
        }
        let content = std::fs::read_to_string(&settings_path)
            .with_context(|| format!("Failed to read {}", settings_path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON in {}", settings_path.display()))
    }

    /// Save the facility name, keeping everything else in the file as it is
    ///
    /// `scoreboardOnly` is never written: the loaded value may come from
    /// `HALISAHA_SCOREBOARD` rather than the file.
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let mut settings = Self::read_settings(data_dir)?;
        settings.app.facility_name = Some(self.facility_name.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(data_dir.join("settings.json"), content)?;
        Ok(())
    }
}
