//! Users command - the people staff can book for

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Input;
use halisaha_core::{LogEvent, NewUser, OperationResult, Role};

use super::{get_context, get_logger, log_event, require_desk};
use crate::output::create_table;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// List the directory
    List {
        /// Filter by name or phone
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a person to the directory
    Add {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Star rating, 0 to 5
        #[arg(long, default_value = "0")]
        rating: u8,
        /// admin or user
        #[arg(long, default_value = "user")]
        role: String,
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: UsersCommands) -> Result<()> {
    match command {
        UsersCommands::List { search, json } => run_list(search, json),
        UsersCommands::Add {
            first_name,
            last_name,
            phone,
            rating,
            role,
            notes,
            json,
        } => run_add(first_name, last_name, phone, rating, role, notes, json),
    }
}

fn run_list(search: Option<String>, json: bool) -> Result<()> {
    let ctx = get_context()?;
    require_desk(&ctx)?;

    let users = ctx.users.search(search.as_deref().unwrap_or(""));

    if json {
        println!("{}", serde_json::to_string_pretty(&users)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Id", "Name", "Phone", "Role", "Rating", "Notes"]);
    for user in users {
        table.add_row(vec![
            user.id.clone(),
            user.full_name(),
            user.phone.clone(),
            user.role.to_string(),
            user.stars(),
            user.notes.clone().unwrap_or_default(),
        ]);
    }
    println!("{}", table);
    Ok(())
}

fn prompt_if_missing(value: Option<String>, prompt: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => Ok(Input::new().with_prompt(prompt).interact_text()?),
    }
}

fn run_add(
    first_name: Option<String>,
    last_name: Option<String>,
    phone: Option<String>,
    rating: u8,
    role: String,
    notes: Option<String>,
    json: bool,
) -> Result<()> {
    let mut ctx = get_context()?;
    require_desk(&ctx)?;

    let role: Role = role.parse()?;
    let mut new_user = NewUser::new(
        prompt_if_missing(first_name, "Ad")?,
        prompt_if_missing(last_name, "Soyad")?,
        prompt_if_missing(phone, "Telefon")?,
    )
    .with_rating(rating)
    .with_role(role);
    if let Some(n) = notes {
        new_user = new_user.with_notes(n);
    }

    let user = ctx.users.add(new_user)?;
    log_event(&get_logger(), LogEvent::new("user_added").with_command("users add"));

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(&user))?);
    } else {
        println!("{}", format!("Added {} ({})", user.full_name(), user.id).green());
    }
    Ok(())
}
