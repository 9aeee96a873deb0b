//! Move command - relocate a booking, keeping its identity

use anyhow::Result;
use colored::Colorize;
use halisaha_core::services::MoveOutcome;
use halisaha_core::{Cell, CellKey, HourSlot, LogEvent, OperationResult, Refusal};

use super::{get_context, get_logger, log_event, parse_date, pitch_index, require_desk};
use crate::output::{reservation_table, warning};

/// `to_*` default to the source cell's coordinates
pub fn run(
    key: String,
    to_date: Option<String>,
    to_hour: Option<String>,
    to_pitch: Option<u8>,
    replace: bool,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    require_desk(&ctx)?;

    // The source may sit on a pitch hidden by a smaller pitch count; the
    // target may not
    let source = CellKey::parse(&key)?;
    let old_key = source.key();
    let pitch_count = ctx.settings.get().pitch_count;
    let target = Cell::new(
        match to_date {
            Some(d) => parse_date(&d)?,
            None => source.date,
        },
        match to_pitch {
            Some(p) => pitch_index(p, pitch_count)?,
            None => source.pitch_index,
        },
        match to_hour {
            Some(h) => h.parse::<HourSlot>()?,
            None => source.hour,
        },
    )
    .on_pitches(pitch_count)?;

    let (reservation, replaced) =
        match ctx.reservations.move_reservation(&old_key, target, replace)? {
            MoveOutcome::Moved {
                reservation,
                replaced,
            } => (reservation, replaced),
            MoveOutcome::SourceMissing => {
                return Err(Refusal::new("missing", format!("No reservation at {}", old_key))
                    .at(&old_key)
                    .into())
            }
            MoveOutcome::Occupied(occupant) => {
                let message = format!(
                    "{} is booked by {} ({}). Use --replace to overwrite.",
                    target.key(),
                    occupant.user.full_name(),
                    occupant.status.label()
                );
                return Err(Refusal::new("occupied", message).at(target.key()).into());
            }
        };

    log_event(
        &get_logger(),
        LogEvent::new("reservation_moved")
            .with_command("move")
            .with_cell_key(reservation.key().as_str()),
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&OperationResult::ok(serde_json::json!({
                "from": old_key,
                "reservation": reservation,
                "replaced": replaced,
            })))?
        );
        return Ok(());
    }

    println!("{}", format!("Moved {} -> {}", old_key, reservation.key()).green());
    println!("{}", reservation_table(&reservation));
    if let Some(old) = replaced {
        warning(&format!("Replaced the booking of {}", old.user.full_name()));
    }
    Ok(())
}
