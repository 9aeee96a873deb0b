//! Status command - bookings and directory at a glance

use anyhow::Result;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use super::{get_context, get_data_dir};
use crate::output::format_size;

pub fn run(json: bool) -> Result<()> {
    let ctx = get_context()?;
    let status = ctx.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", ctx.config.facility_name.bold());
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Users".to_string(), status.total_users.to_string()]);
    table.add_row(vec![
        "Reservations".to_string(),
        status.total_reservations.to_string(),
    ]);
    for entry in &status.by_status {
        table.add_row(vec![format!("  {}", entry.label), entry.count.to_string()]);
    }
    table.add_row(vec![
        "Pitches".to_string(),
        ctx.settings.get().pitch_count.to_string(),
    ]);

    println!("{}", table);
    println!();

    if let (Some(earliest), Some(latest)) = (&status.date_range.earliest, &status.date_range.latest) {
        println!("Date range: {} to {}", earliest, latest);
    }

    let data_dir = get_data_dir()?;
    let size = std::fs::metadata(data_dir.join(halisaha_core::STORE_FILENAME))
        .map(|m| m.len())
        .unwrap_or(0);
    println!("Store: {} ({})", data_dir.display(), format_size(size));
    println!(
        "Session: {}",
        if ctx.config.scoreboard_only {
            "scoreboard display".to_string()
        } else if ctx.auth.is_authenticated() {
            "logged in".green().to_string()
        } else {
            "logged out".yellow().to_string()
        }
    );

    Ok(())
}
