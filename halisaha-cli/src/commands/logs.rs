//! Logs command - view and manage the event log

use anyhow::Result;
use chrono::{Duration, Local, TimeZone, Utc};
use clap::Subcommand;
use colored::Colorize;
use comfy_table::{Cell, Color};
use dialoguer::Confirm;
use halisaha_core::{EntryPoint, LogEntry, LoggingService};

use super::get_data_dir;
use crate::output::{create_table, format_size, info, success};

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show the most recent entries, newest first
    List {
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Only entries that recorded a failure
        #[arg(long)]
        errors: bool,
        #[arg(long)]
        json: bool,
    },
    /// Delete entries
    Clear {
        /// Only entries older than this many days (default: all)
        #[arg(long, value_name = "DAYS")]
        older_than: Option<u32>,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
        #[arg(long)]
        json: bool,
    },
    /// Entry counts, most frequent events and the log file location
    Stats {
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let service = LoggingService::new(&data_dir, EntryPoint::Cli, env!("CARGO_PKG_VERSION"))?;

    match command {
        LogsCommands::List { limit, errors, json } => list(&service, limit, errors, json),
        LogsCommands::Clear {
            older_than,
            force,
            json,
        } => clear(&service, older_than, force, json),
        LogsCommands::Stats { json } => stats(&service, json),
    }
}

/// Local wall-clock time of a unix-millisecond timestamp
fn local_time(timestamp_ms: i64) -> String {
    match Local.timestamp_millis_opt(timestamp_ms).single() {
        Some(t) => t.format("%d.%m.%Y %H:%M:%S").to_string(),
        None => timestamp_ms.to_string(),
    }
}

fn context_of(entry: &LogEntry) -> String {
    let mut parts = Vec::new();
    if let Some(command) = &entry.command {
        parts.push(format!("hs {}", command));
    }
    if let Some(screen) = &entry.screen {
        parts.push(format!("[{}]", screen));
    }
    if let Some(key) = &entry.cell_key {
        parts.push(key.clone());
    }
    parts.join(" ")
}

fn list(service: &LoggingService, limit: usize, errors_only: bool, json: bool) -> Result<()> {
    let entries = if errors_only {
        service.get_errors(limit)?
    } else {
        service.get_recent(limit)?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        info("The log is empty.");
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["When", "Event", "Context", "Source"]);
    for entry in &entries {
        let event = if entry.is_error() {
            Cell::new(&entry.event).fg(Color::Red)
        } else {
            Cell::new(&entry.event)
        };
        table.add_row(vec![
            Cell::new(local_time(entry.timestamp)),
            event,
            Cell::new(context_of(entry)),
            Cell::new(format!("{} {}", entry.entry_point, entry.app_version)),
        ]);
    }
    println!("{}", table);

    // Failure categories go under the table
    let failures: Vec<&LogEntry> = entries.iter().filter(|e| e.is_error()).take(5).collect();
    if !failures.is_empty() {
        println!();
        for entry in failures {
            println!(
                "{} {}: {}",
                local_time(entry.timestamp).dimmed(),
                entry.event.red(),
                entry.error_message.as_deref().unwrap_or_default()
            );
        }
    }
    Ok(())
}

fn clear(service: &LoggingService, older_than: Option<u32>, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let prompt = match older_than {
            Some(days) => format!("Delete log entries older than {} days?", days),
            None => "Delete the whole log?".to_string(),
        };
        if !Confirm::new().with_prompt(prompt).default(false).interact()? {
            info("Nothing deleted.");
            return Ok(());
        }
    }

    let deleted = match older_than {
        Some(days) => {
            let cutoff = Utc::now() - Duration::days(i64::from(days));
            service.delete_before(cutoff.timestamp_millis())?
        }
        None => service.clear()?,
    };

    if json {
        println!("{}", serde_json::json!({ "deleted": deleted }));
    } else {
        success(&format!("Deleted {} log entries", deleted));
    }
    Ok(())
}

fn stats(service: &LoggingService, json: bool) -> Result<()> {
    let stats = service.stats()?;
    let path = service.db_path();
    let size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stats": stats,
                "path": path.display().to_string(),
                "size_bytes": size,
            }))?
        );
        return Ok(());
    }

    let mut table = create_table();
    table.add_row(vec!["Entries".to_string(), stats.total.to_string()]);
    table.add_row(vec!["Failures".to_string(), stats.errors.to_string()]);
    if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
        table.add_row(vec!["First".to_string(), local_time(oldest)]);
        table.add_row(vec!["Last".to_string(), local_time(newest)]);
    }
    table.add_row(vec!["File".to_string(), path.display().to_string()]);
    table.add_row(vec!["Size".to_string(), format_size(size)]);
    println!("{}", table);

    if !stats.top_events.is_empty() {
        let mut events = create_table();
        events.set_header(vec!["Event", "Count"]);
        for (event, count) in &stats.top_events {
            events.add_row(vec![event.clone(), count.to_string()]);
        }
        println!("{}", events);
    }
    Ok(())
}
