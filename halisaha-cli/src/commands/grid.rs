//! Grid command - one day of bookings, hours by pitches

use anyhow::Result;
use chrono::Local;
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{Cell, CellAlignment};
use halisaha_core::services::{day_grid, DateStep};
use halisaha_core::ReservationStatus;

use super::{get_context, parse_date, require_desk};
use crate::output::{create_table, status_color};

/// Navigation relative to the given date
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Step {
    PrevWeek,
    PrevDay,
    Today,
    NextDay,
    NextWeek,
}

impl From<Step> for DateStep {
    fn from(step: Step) -> Self {
        match step {
            Step::PrevWeek => DateStep::PreviousWeek,
            Step::PrevDay => DateStep::PreviousDay,
            Step::Today => DateStep::Today,
            Step::NextDay => DateStep::NextDay,
            Step::NextWeek => DateStep::NextWeek,
        }
    }
}

pub fn run(date: Option<String>, step: Option<Step>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_desk(&ctx)?;

    let today = Local::now().date_naive();
    let mut shown = match date {
        Some(d) => parse_date(&d)?,
        None => today,
    };
    if let Some(step) = step {
        shown = DateStep::from(step).apply(shown, today);
    }

    let grid = day_grid(shown, ctx.settings.get().pitch_count, &ctx.reservations)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&grid)?);
        return Ok(());
    }

    println!(
        "{} - {}",
        ctx.config.facility_name.bold(),
        shown.format("%d.%m.%Y %A")
    );
    println!();

    let mut table = create_table();
    let mut header = vec![Cell::new("Saat")];
    header.extend((1..=grid.pitch_count).map(|p| Cell::new(format!("Saha {}", p))));
    table.set_header(header);

    for row in &grid.rows {
        let mut cells = vec![Cell::new(row.hour.to_string())];
        for cell in &row.cells {
            let text = cell.occupant.clone().unwrap_or_else(|| "-".to_string());
            cells.push(
                Cell::new(text)
                    .fg(status_color(cell.status))
                    .set_alignment(CellAlignment::Center),
            );
        }
        table.add_row(cells);
    }

    println!("{}", table);
    println!();
    let legend: Vec<String> = ReservationStatus::ALL
        .iter()
        .map(|s| s.label().to_string())
        .collect();
    println!(
        "{} booked cell(s). Colors: {} yellow, {} orange, {} green.",
        grid.booked(),
        legend[0],
        legend[1],
        legend[2]
    );

    Ok(())
}
