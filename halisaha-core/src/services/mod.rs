//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! owns one persisted entry or one feature area.

pub mod alarm;
pub mod auth;
pub mod directory;
mod doctor;
pub mod grid;
pub mod logging;
pub mod migration;
mod persisted;
pub mod reservation;
pub mod scoreboard;
mod settings;
mod status;

pub use alarm::{AlarmCue, AlarmEvaluator, PULSE_GAP_MS};
pub use auth::{AuthService, Session, LOGIN_FAILED_MESSAGE};
pub use directory::UserDirectory;
pub use doctor::{CheckResult, DoctorResult, DoctorService, DoctorSummary};
pub use grid::{day_grid, DateStep, DayGrid, GridCell, GridRow};
pub use logging::{EntryPoint, LogEntry, LogEvent, LogStats, LoggingService};
pub use migration::{MigrationResult, MigrationService};
pub use persisted::Persisted;
pub use reservation::{CreateOutcome, MoveOutcome, ReservationMap, ReservationService, UpdateOutcome};
pub use scoreboard::{clock_text, format_counter, Counters, ScoreboardMode, ScoreboardService};
pub use settings::SettingsService;
pub use status::{DateRange, StatusCount, StatusService, StatusSummary};
