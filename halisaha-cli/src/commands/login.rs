//! Login / logout - the desk session

use std::io::BufRead;

use anyhow::{bail, Result};
use colored::Colorize;
use dialoguer::{Input, Password};
use halisaha_core::services::LOGIN_FAILED_MESSAGE;
use halisaha_core::{LogEvent, OperationResult};

use super::{get_context, get_logger, log_event};

fn read_stdin_line() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn run_login(phone: Option<String>, password: Option<String>, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    if ctx.config.scoreboard_only {
        bail!("This installation is a scoreboard display; there is no desk login");
    }

    let phone = match phone {
        Some(p) => p,
        None => Input::new().with_prompt("Telefon").interact_text()?,
    };
    // Piped password for scripts, prompt otherwise
    let password = match password {
        Some(p) => p,
        None if atty::isnt(atty::Stream::Stdin) => read_stdin_line()?,
        None => Password::new().with_prompt("Şifre").interact()?,
    };

    let accepted = ctx.auth.login(&phone, &password)?;
    let logger = get_logger();

    if json {
        let result: OperationResult<bool> = if accepted {
            OperationResult::ok(true)
        } else {
            OperationResult::fail(LOGIN_FAILED_MESSAGE)
        };
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if !accepted {
        log_event(
            &logger,
            LogEvent::new("login_failed")
                .with_command("login")
                .with_error("wrong credentials"),
        );
        bail!(LOGIN_FAILED_MESSAGE);
    }

    log_event(&logger, LogEvent::new("login_succeeded").with_command("login"));
    if !json {
        println!("{}", format!("Welcome to {}", ctx.config.facility_name).green());
    }
    Ok(())
}

pub fn run_logout(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    ctx.auth.logout()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&OperationResult::ok(true))?);
    } else {
        println!("Logged out.");
    }
    Ok(())
}
