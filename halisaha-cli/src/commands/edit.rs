//! Edit command - change status, user or notes of a booking in place

use anyhow::Result;
use colored::Colorize;
use halisaha_core::services::UpdateOutcome;
use halisaha_core::{LogEvent, OperationResult, Refusal, ReservationDraft, ReservationStatus};

use super::{get_context, get_logger, log_event, require_desk, resolve_user, CellArgs};
use crate::output::reservation_table;

pub fn run(
    cell: CellArgs,
    user: Option<String>,
    status: Option<String>,
    notes: Option<String>,
    clear_notes: bool,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    require_desk(&ctx)?;

    let key = cell.resolve_existing()?.key();
    let missing = || Refusal::new("missing", format!("No reservation at {}", key)).at(&key);
    let Some(existing) = ctx.reservations.get(&key).cloned() else {
        return Err(missing().into());
    };

    let user = match user {
        Some(query) => resolve_user(&ctx, &query)?,
        None => existing.user.clone(),
    };
    let status: ReservationStatus = match status {
        Some(s) => s.parse()?,
        None => existing.status,
    };
    let notes = if clear_notes {
        None
    } else {
        notes.or_else(|| existing.notes.clone())
    };

    let mut draft = ReservationDraft::new(existing.cell(), user, status);
    if let Some(n) = notes {
        draft = draft.with_notes(n);
    }

    let updated = match ctx.reservations.update(&key, draft)? {
        UpdateOutcome::Updated(r) => r,
        UpdateOutcome::Missing => return Err(missing().into()),
    };

    log_event(
        &get_logger(),
        LogEvent::new("reservation_updated")
            .with_command("edit")
            .with_cell_key(key.as_str()),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&updated))?);
    } else {
        println!("{}", "Reservation updated".green());
        println!("{}", reservation_table(&updated));
    }
    Ok(())
}
