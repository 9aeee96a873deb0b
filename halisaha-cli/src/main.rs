//! Halısaha CLI - the pitch booking desk in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{
    cancel, doctor, edit, get_logger, grid, login, logs, move_cmd, reserve, scoreboard,
    settings, show, status, users, CellArgs,
};

/// Halısaha - pitch booking desk in your terminal
#[derive(Parser)]
#[command(name = "hs", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the booking desk
    Login {
        /// Desk phone number
        #[arg(long)]
        phone: Option<String>,
        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// End the desk session
    Logout {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the booking grid for a day
    Grid {
        /// Date (YYYY-MM-DD, today, tomorrow); defaults to today
        date: Option<String>,
        /// Move relative to the date
        #[arg(long, value_enum)]
        step: Option<grid::Step>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Book an empty cell
    Reserve {
        #[command(flatten)]
        cell: CellArgs,
        /// User id, name or phone
        #[arg(long)]
        user: Option<String>,
        /// hold, tentative or confirmed (beklet, ön, kesin)
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Overwrite an existing booking in the cell
        #[arg(long)]
        replace: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the booking in a cell
    Show {
        #[command(flatten)]
        cell: CellArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change user, status or notes of a booking
    Edit {
        #[command(flatten)]
        cell: CellArgs,
        /// User id, name or phone
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,
        #[arg(long)]
        clear_notes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a booking
    Cancel {
        #[command(flatten)]
        cell: CellArgs,
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Move a booking to another cell
    Move {
        /// Cell key of the booking to move
        key: String,
        /// Target date (defaults to the current one)
        #[arg(long = "to-date")]
        to_date: Option<String>,
        /// Target hour (defaults to the current one)
        #[arg(long = "to-hour")]
        to_hour: Option<String>,
        /// Target pitch number, 1-based (defaults to the current one)
        #[arg(long = "to-pitch")]
        to_pitch: Option<u8>,
        /// Overwrite a booking in the target cell
        #[arg(long)]
        replace: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the user directory
    Users {
        #[command(subcommand)]
        command: users::UsersCommands,
    },

    /// Display settings
    Settings {
        #[command(subcommand)]
        command: settings::SettingsCommands,
    },

    /// Run the scoreboard
    Scoreboard {
        /// Pitch to watch for alarms, 1-based (saved as the default)
        #[arg(long)]
        pitch: Option<u8>,
        /// Print one frame and exit
        #[arg(long)]
        once: bool,
    },

    /// Show booking summary
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run data health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and manage the event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login { .. } => "login",
            Commands::Logout { .. } => "logout",
            Commands::Grid { .. } => "grid",
            Commands::Reserve { .. } => "reserve",
            Commands::Show { .. } => "show",
            Commands::Edit { .. } => "edit",
            Commands::Cancel { .. } => "cancel",
            Commands::Move { .. } => "move",
            Commands::Users { .. } => "users",
            Commands::Settings { .. } => "settings",
            Commands::Scoreboard { .. } => "scoreboard",
            Commands::Status { .. } => "status",
            Commands::Doctor { .. } => "doctor",
            Commands::Logs { .. } => "logs",
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let name = cli.command.name();

    // The log file is opened per write; commands open it too. `logs` manages
    // the log itself and is not recorded.
    let logged = name != "logs";
    if logged {
        if let Some(l) = get_logger() {
            let _ = l.log_command(name);
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if logged {
                if let Some(l) = get_logger() {
                    let _ = l.log_failure(name, &e);
                }
            }
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Login { phone, password, json } => login::run_login(phone, password, json),
        Commands::Logout { json } => login::run_logout(json),
        Commands::Grid { date, step, json } => grid::run(date, step, json),
        Commands::Reserve { cell, user, status, notes, replace, json } => {
            reserve::run(cell, user, status, notes, replace, json)
        }
        Commands::Show { cell, json } => show::run(cell, json),
        Commands::Edit { cell, user, status, notes, clear_notes, json } => {
            edit::run(cell, user, status, notes, clear_notes, json)
        }
        Commands::Cancel { cell, force, json } => cancel::run(cell, force, json),
        Commands::Move { key, to_date, to_hour, to_pitch, replace, json } => {
            move_cmd::run(key, to_date, to_hour, to_pitch, replace, json)
        }
        Commands::Users { command } => users::run(command),
        Commands::Settings { command } => settings::run(command),
        Commands::Scoreboard { pitch, once } => scoreboard::run(pitch, once),
        Commands::Status { json } => status::run(json),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Logs { command } => logs::run(command),
    }
}
