//! Reserve command - book an empty cell

use anyhow::Result;
use colored::Colorize;
use dialoguer::{Input, Select};
use halisaha_core::services::CreateOutcome;
use halisaha_core::{
    LogEvent, OperationResult, Refusal, Reservation, ReservationDraft, ReservationStatus,
};

use super::{get_context, get_logger, log_event, require_desk, resolve_user, CellArgs};
use crate::output::{reservation_table, warning};

pub fn run(
    cell: CellArgs,
    user: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    replace: bool,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    require_desk(&ctx)?;

    let cell = cell.resolve(ctx.settings.get().pitch_count)?;

    let user = match user {
        Some(query) => resolve_user(&ctx, &query)?,
        None => {
            let users = ctx.users.list();
            let names: Vec<String> = users
                .iter()
                .map(|u| format!("{} {} ({})", u.full_name(), u.stars(), u.phone))
                .collect();
            let choice = Select::new()
                .with_prompt("Kişi")
                .items(&names)
                .default(0)
                .interact()?;
            users[choice].clone()
        }
    };

    let status: ReservationStatus = match status {
        Some(s) => s.parse()?,
        None => {
            let labels: Vec<&str> = ReservationStatus::ALL.iter().map(|s| s.label()).collect();
            let choice = Select::new()
                .with_prompt("Durum")
                .items(&labels)
                .default(2)
                .interact()?;
            ReservationStatus::ALL[choice]
        }
    };

    let notes = match notes {
        Some(n) => Some(n),
        None if json => None,
        None => Some(
            Input::<String>::new()
                .with_prompt("Not")
                .allow_empty(true)
                .interact_text()?,
        ),
    };

    let mut draft = ReservationDraft::new(cell, user, status);
    if let Some(n) = notes {
        draft = draft.with_notes(n);
    }

    let (reservation, replaced): (Reservation, Option<Reservation>) = if replace {
        ctx.reservations.create_or_replace(draft)?
    } else {
        match ctx.reservations.create(draft)? {
            CreateOutcome::Created(r) => (r, None),
            CreateOutcome::Occupied(existing) => {
                let message = format!(
                    "Cell {} is already booked by {} ({}). Use --replace to overwrite.",
                    existing.key(),
                    existing.user.full_name(),
                    existing.status.label()
                );
                if json {
                    let result: OperationResult<Reservation> = OperationResult::fail(message.clone())
                        .with_context("key", existing.key().to_string());
                    println!("{}", serde_json::to_string_pretty(&result)?);
                }
                return Err(Refusal::new("occupied", message).at(existing.key()).into());
            }
        }
    };

    log_event(
        &get_logger(),
        LogEvent::new("reservation_created")
            .with_command("reserve")
            .with_cell_key(reservation.key().as_str()),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&reservation))?);
        return Ok(());
    }

    println!("{}", "Reservation saved".green());
    println!("{}", reservation_table(&reservation));
    if let Some(old) = replaced {
        warning(&format!(
            "Replaced the booking of {} ({})",
            old.user.full_name(),
            old.status.label()
        ));
    }
    Ok(())
}
