//! Show command - one cell's reservation

use anyhow::Result;
use halisaha_core::OperationResult;

use super::{get_context, require_desk, CellArgs};
use crate::output::{info, reservation_table};

pub fn run(cell: CellArgs, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_desk(&ctx)?;

    let cell = cell.resolve_existing()?;
    let key = cell.key();
    let reservation = ctx.reservations.get_cell(&cell);

    if json {
        let result = match reservation {
            Some(r) => OperationResult::ok(r),
            None => OperationResult::fail(format!("No reservation at {}", key)),
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    match reservation {
        Some(r) => println!("{}", reservation_table(r)),
        None => info(&format!("{} is free", key)),
    }
    Ok(())
}
