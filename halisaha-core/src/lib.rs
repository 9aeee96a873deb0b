//! Halısaha Core - booking logic for a single pitch facility
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Cells, reservations, users, display settings
//! - **ports**: Trait definitions for external dependencies (KeyValueStore)
//! - **services**: Reservation store, directory, auth gate, alarms, scoreboard
//! - **adapters**: Concrete implementations (DuckDB, in-memory)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod migrations;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::duckdb::DuckDbKvStore;
use config::Config;
use ports::KeyValueStore;
use services::*;

// Re-export commonly used types at crate root
pub use domain::result::{Error, OperationResult, Refusal};
pub use domain::{
    Cell, CellKey, DisplaySettings, HourSlot, NewUser, Reservation, ReservationDraft,
    ReservationStatus, Role, User,
};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService};

/// File name of the key-value store inside the data directory
pub const STORE_FILENAME: &str = "halisaha.duckdb";

/// Main context for booking desk operations
///
/// Holds the configuration, the key-value store and one service per
/// persisted entry.
pub struct HalisahaContext {
    pub config: Config,
    pub store: Arc<dyn KeyValueStore>,
    pub reservations: ReservationService,
    pub users: UserDirectory,
    pub auth: AuthService,
    pub settings: SettingsService,
    pub scoreboard: ScoreboardService,
    pub status_service: StatusService,
    pub doctor_service: DoctorService,
}

impl HalisahaContext {
    /// Open the store in `data_dir` (creating it on first use)
    pub fn new(data_dir: &Path) -> Result<Self> {
        let config = Config::load(data_dir)?;

        let db_path = data_dir.join(STORE_FILENAME);
        let kv = DuckDbKvStore::open(&db_path)
            .with_context(|| format!("Failed to open {}", db_path.display()))?;

        Self::with_store(config, Arc::new(kv))
    }

    /// Build every service over an already opened store
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            reservations: ReservationService::new(Arc::clone(&store))?,
            users: UserDirectory::new(Arc::clone(&store))?,
            auth: AuthService::new(Arc::clone(&store))?,
            settings: SettingsService::new(Arc::clone(&store))?,
            scoreboard: ScoreboardService::new(Arc::clone(&store))?,
            status_service: StatusService::new(),
            doctor_service: DoctorService::new(),
            config,
            store,
        })
    }

    /// Which scoreboard this session is allowed to open
    pub fn scoreboard_mode(&self) -> ScoreboardMode {
        if self.config.scoreboard_only {
            ScoreboardMode::Standalone
        } else {
            ScoreboardMode::Embedded
        }
    }

    pub fn status(&self) -> StatusSummary {
        self.status_service.get_status(&self.reservations, &self.users)
    }

    pub fn doctor(&self) -> Result<DoctorResult> {
        let stored_keys = self.store.keys()?;
        Ok(self.doctor_service.run_checks(
            &self.reservations,
            &self.users,
            self.settings.get(),
            &stored_keys,
        ))
    }

    /// Rehydrate every mirror from the store
    pub fn reload(&mut self) -> Result<()> {
        self.reservations.reload()?;
        self.users.reload()?;
        self.settings.reload()?;
        Ok(())
    }
}
