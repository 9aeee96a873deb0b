//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

pub mod cell;
mod reservation;
pub mod result;
pub mod settings;
mod user;

pub use cell::{Cell, CellKey, HourSlot, MAX_PITCHES};
pub use reservation::{Reservation, ReservationDraft, ReservationStatus};
pub use settings::{
    ColorSetting, Direction, DisplaySettings, KeyBindings, KeySlot, LayoutSetting, PALETTE,
};
pub use user::{NewUser, Role, User, MAX_RATING};
