//! Doctor command - integrity checks over the stored bookings

use anyhow::{bail, Result};
use colored::Colorize;
use comfy_table::{Cell, Color};
use halisaha_core::services::CheckResult;
use serde_json::Value;

use super::get_context;
use crate::output::{create_table, success};

fn status_cell(check: &CheckResult) -> Cell {
    match check.status.as_str() {
        "pass" => Cell::new("ok").fg(Color::Green),
        "warning" => Cell::new("warn").fg(Color::Yellow),
        "error" => Cell::new("FAIL").fg(Color::Red),
        other => Cell::new(other),
    }
}

/// One finding as `field=value` pairs
fn finding_line(finding: &Value) -> String {
    let Value::Object(fields) = finding else {
        return finding.to_string();
    };
    fields
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| match v.as_str() {
            Some(s) => format!("{}={}", k, s),
            None => format!("{}={}", k, v),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn run(verbose: bool, json: bool) -> Result<()> {
    let ctx = get_context()?;
    let report = ctx.doctor()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let mut table = create_table();
        table.set_header(vec!["Check", "Result", "Finding"]);
        for (name, check) in &report.checks {
            let mut finding = check.message.clone();
            if verbose {
                for detail in check.details.iter().flatten() {
                    finding.push_str("\n  ");
                    finding.push_str(&finding_line(detail));
                }
            }
            table.add_row(vec![Cell::new(name), status_cell(check), Cell::new(finding)]);
        }
        println!("{}", table);

        let summary = &report.summary;
        if summary.errors == 0 && summary.warnings == 0 {
            success(&format!("All {} checks passed", summary.passed));
        } else {
            println!(
                "{} passed, {} with warnings, {} failed",
                summary.passed,
                summary.warnings.to_string().yellow(),
                summary.errors.to_string().red()
            );
        }
    }

    if report.summary.errors > 0 {
        bail!("{} integrity check(s) failed", report.summary.errors);
    }
    Ok(())
}
