//! Scoreboard command - live clock, two counters and match alarms
//!
//! Keys arrive as stdin lines; every character of a line is one key press.
//! `:reset` zeroes both counters, `:q` quits.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Result};
use chrono::{Local, NaiveDateTime, Timelike};
use colored::Colorize;
use halisaha_core::domain::settings::palette_color;
use halisaha_core::domain::ColorSetting;
use halisaha_core::services::{
    clock_text, format_counter, AlarmCue, AlarmEvaluator, ScoreboardMode, PULSE_GAP_MS,
};
use halisaha_core::{EntryPoint, HalisahaContext, LogEvent, LoggingService};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::{get_context, get_data_dir, log_event, pitch_index};
use crate::output::palette_color as terminal_color;

const TICK: Duration = Duration::from_millis(250);

/// Opened per event; the desk writes to the same log file
fn scoreboard_logger() -> Option<LoggingService> {
    let data_dir = get_data_dir().ok()?;
    LoggingService::new(&data_dir, EntryPoint::Scoreboard, env!("CARGO_PKG_VERSION")).ok()
}

fn render(
    ctx: &HalisahaContext,
    mode: ScoreboardMode,
    now: NaiveDateTime,
    last_cue: Option<AlarmCue>,
    problem: Option<&str>,
) {
    let settings = ctx.settings.get();
    let counters = ctx.scoreboard.counters();
    let clock_fg = terminal_color(palette_color(settings.color_index(ColorSetting::ClockNumber)));
    let clock_bg = terminal_color(palette_color(settings.color_index(ColorSetting::ClockBackground)));
    let label = terminal_color(palette_color(settings.color_index(ColorSetting::CounterText)));
    let number = terminal_color(palette_color(settings.color_index(ColorSetting::CounterNumber)));
    let keys = &settings.key_bindings;

    let mut out = String::from("\x1B[2J\x1B[H");
    out.push_str(&format!("{}\n\n", ctx.config.facility_name.bold()));
    out.push_str(&format!(
        "   {}\n\n",
        format!(" {} ", clock_text(&now, settings.show_seconds))
            .color(clock_fg)
            .on_color(clock_bg)
            .bold()
    ));
    out.push_str(&format!(
        "   {} {}      {} {}\n\n",
        "A".color(label).bold(),
        format_counter(counters.left).color(number).bold(),
        "B".color(label).bold(),
        format_counter(counters.right).color(number).bold(),
    ));
    out.push_str(&format!(
        "   A: {} +  {} -    B: {} +  {} -    :reset  :q\n",
        keys.a_increment, keys.a_decrement, keys.b_increment, keys.b_decrement
    ));
    if mode.alarms_enabled() {
        out.push_str(&format!(
            "   Alarms on for Saha {}\n",
            settings.scoreboard_pitch + 1
        ));
    }
    if let Some(cue) = last_cue {
        out.push_str(&format!("\n   {}\n", cue.description().yellow().bold()));
    }
    if !settings.notes.is_empty() {
        out.push_str(&format!("\n   {}\n", settings.notes.dimmed()));
    }
    if let Some(problem) = problem {
        out.push_str(&format!("\n   {}\n", problem.red()));
    }

    print!("{}", out);
    let _ = std::io::stdout().flush();
}

/// One BEL per pulse, spaced by the cue's tone length plus the gap
async fn sound(cue: AlarmCue) {
    for _ in 0..cue.pulses() {
        print!("\x07");
        let _ = std::io::stdout().flush();
        tokio::time::sleep(Duration::from_millis(cue.tone_ms() + PULSE_GAP_MS)).await;
    }
}

pub fn run(pitch: Option<u8>, once: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let mode = ctx.scoreboard_mode();
    if mode.requires_login() && !ctx.auth.is_authenticated() {
        bail!("Not logged in. Run `hs login` first.");
    }
    if let Some(p) = pitch {
        let index = pitch_index(p, ctx.settings.get().pitch_count)?;
        ctx.settings.set_scoreboard_pitch(index)?;
    }

    if once {
        render(&ctx, mode, Local::now().naive_local(), None, None);
        println!();
        return Ok(());
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(run_loop(ctx, mode))
}

async fn run_loop(mut ctx: HalisahaContext, mode: ScoreboardMode) -> Result<()> {
    if let Some(l) = scoreboard_logger() {
        let _ = l.log_screen("scoreboard");
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut ticker = tokio::time::interval(TICK);
    let mut alarms = AlarmEvaluator::new();
    let mut input_open = true;
    let mut last_cue = None;
    let mut shown = String::new();
    let mut reloaded_at = None;
    // Last store error; the board keeps running on its mirrors meanwhile
    let mut problem: Option<String> = None;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Local::now().naive_local();

                if mode.alarms_enabled() && now.second() == 0 {
                    // Bookings and settings may have changed from the desk
                    let minute = Some((now.hour(), now.minute()));
                    if reloaded_at != minute {
                        reloaded_at = minute;
                        problem = ctx.reload().err().map(|e| format!("Store unavailable: {}", e));
                    }
                    let pitch = ctx.settings.get().scoreboard_pitch;
                    if let Some(cue) = alarms.tick_with_store(now, pitch, &ctx.reservations) {
                        log_event(
                            &scoreboard_logger(),
                            LogEvent::new(format!("alarm_{}", cue.code()))
                                .with_screen("scoreboard"),
                        );
                        last_cue = Some(cue);
                        render(&ctx, mode, now, last_cue, problem.as_deref());
                        sound(cue).await;
                    }
                }

                let text = clock_text(&now, ctx.settings.get().show_seconds);
                if text != shown {
                    shown = text;
                    render(&ctx, mode, now, last_cue, problem.as_deref());
                }
            }
            line = rx.recv(), if input_open => {
                let Some(line) = line else {
                    input_open = false;
                    continue;
                };
                let written = match line.trim() {
                    ":q" | ":quit" => break,
                    ":reset" => ctx.scoreboard.reset(),
                    keys => {
                        let bindings = ctx.settings.get().key_bindings.clone();
                        keys.chars()
                            .filter(|c| !c.is_whitespace())
                            .try_for_each(|key| ctx.scoreboard.handle_key(key, &bindings).map(|_| ()))
                    }
                };
                problem = written.err().map(|e| format!("Counter not saved: {}", e));
                render(&ctx, mode, Local::now().naive_local(), last_cue, problem.as_deref());
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    println!();
    Ok(())
}
