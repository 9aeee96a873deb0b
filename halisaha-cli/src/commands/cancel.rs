//! Cancel command - delete a booking

use anyhow::Result;
use dialoguer::Confirm;
use halisaha_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event, require_desk, CellArgs};
use crate::output::{info, success};

pub fn run(cell: CellArgs, force: bool, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    require_desk(&ctx)?;

    let key = cell.resolve_existing()?.key();

    if !force && !json {
        if let Some(existing) = ctx.reservations.get(&key) {
            let prompt = format!(
                "Cancel {}'s booking at {}?",
                existing.user.full_name(),
                key
            );
            if !Confirm::new().with_prompt(prompt).default(false).interact()? {
                println!("Cancelled.");
                return Ok(());
            }
        }
    }

    let removed = ctx.reservations.delete(&key)?;
    if removed.is_some() {
        log_event(
            &get_logger(),
            LogEvent::new("reservation_deleted")
                .with_command("cancel")
                .with_cell_key(key.as_str()),
        );
    }

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&OperationResult::ok(serde_json::json!({
                "key": key,
                "removed": removed,
            })))?
        );
        return Ok(());
    }

    match removed {
        Some(r) => success(&format!("Booking of {} at {} removed", r.user.full_name(), key)),
        None => info(&format!("{} was already free", key)),
    }
    Ok(())
}
