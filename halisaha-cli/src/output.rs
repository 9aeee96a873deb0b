//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Color, ContentArrangement, Table};
use halisaha_core::domain::settings::PaletteColor;
use halisaha_core::{Reservation, ReservationStatus};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

const ORANGE: (u8, u8, u8) = (255, 140, 0);
const PINK: (u8, u8, u8) = (236, 72, 153);

/// Grid color of a booking status
pub fn status_color(status: Option<ReservationStatus>) -> Color {
    match status {
        Some(ReservationStatus::Hold) => Color::Yellow,
        Some(ReservationStatus::Tentative) => Color::Rgb {
            r: ORANGE.0,
            g: ORANGE.1,
            b: ORANGE.2,
        },
        Some(ReservationStatus::Confirmed) => Color::Green,
        None => Color::White,
    }
}

/// Terminal color closest to a palette entry
pub fn palette_color(color: &PaletteColor) -> colored::Color {
    match color.name {
        "red" => colored::Color::Red,
        "blue" => colored::Color::Blue,
        "green" => colored::Color::Green,
        "purple" => colored::Color::Magenta,
        "orange" => colored::Color::TrueColor {
            r: ORANGE.0,
            g: ORANGE.1,
            b: ORANGE.2,
        },
        "pink" => colored::Color::TrueColor {
            r: PINK.0,
            g: PINK.1,
            b: PINK.2,
        },
        "yellow" => colored::Color::Yellow,
        "gray" => colored::Color::BrightBlack,
        _ => colored::Color::White,
    }
}

/// Key/value table describing one reservation
pub fn reservation_table(reservation: &Reservation) -> Table {
    let mut table = create_table();
    table.add_row(vec!["Key".to_string(), reservation.key().to_string()]);
    table.add_row(vec!["Date".to_string(), reservation.date.to_string()]);
    table.add_row(vec!["Hour".to_string(), reservation.hour.to_string()]);
    table.add_row(vec![
        "Pitch".to_string(),
        format!("Saha {}", reservation.pitch_index + 1),
    ]);
    table.add_row(vec![
        "User".to_string(),
        format!("{} ({})", reservation.user.full_name(), reservation.user.phone),
    ]);
    table.add_row(vec!["Rating".to_string(), reservation.user.stars()]);
    table.add_row(vec!["Status".to_string(), reservation.status.label().to_string()]);
    if let Some(notes) = &reservation.notes {
        table.add_row(vec!["Notes".to_string(), notes.clone()]);
    }
    table.add_row(vec!["Id".to_string(), reservation.id.clone()]);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
