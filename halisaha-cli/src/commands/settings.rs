//! Settings command - display preferences for the grid and scoreboard

use anyhow::{bail, Result};
use clap::{Subcommand, ValueEnum};
use colored::Colorize;
use dialoguer::Confirm;
use halisaha_core::domain::settings::{palette_color, PALETTE};
use halisaha_core::domain::{ColorSetting, Direction, KeySlot, LayoutSetting};
use halisaha_core::{DisplaySettings, LogEvent};

use super::{
    get_context, get_data_dir, get_logger, log_event, pitch_index, require_settings_access,
};
use crate::output::{create_table, palette_color as terminal_color, success};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Side {
    Left,
    Right,
}

#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show every setting
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle seconds on the scoreboard clock
    Seconds,
    /// Step a color slider (clock-bg, clock-number, counter-text, counter-number)
    Color {
        setting: String,
        #[arg(value_enum)]
        direction: Side,
    },
    /// Rebind a counter key (a-inc, a-dec, b-inc, b-dec); the last character is used
    Key { slot: String, value: String },
    /// Button delay in seconds (clamped to 1-10)
    Delay {
        #[arg(allow_negative_numbers = true)]
        seconds: i64,
    },
    /// Shortcut key; the last character is used, a space means Space
    Shortcut { value: String },
    /// Decrement key; the last character is used
    DecrementKey { value: String },
    /// Set one layout size (counter-width, clock-font-height, ...), clamped to its range
    Size {
        element: String,
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
    /// Set or clear the staff notes
    Notes {
        text: Option<String>,
        #[arg(long)]
        clear: bool,
    },
    /// Number of pitches in the grid (1-6)
    Pitches { count: u8 },
    /// Pitch the standalone scoreboard watches for alarms (1-based)
    ScoreboardPitch { pitch: u8 },
    /// Facility name shown in headers (saved to settings.json)
    Facility { name: String },
    /// Restore every default
    Reset {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

fn color_row(settings: &DisplaySettings, label: &str, setting: ColorSetting) -> Vec<String> {
    let color = palette_color(settings.color_index(setting));
    vec![
        label.to_string(),
        format!(
            "{} {}",
            "■".color(terminal_color(color)),
            color.label
        ),
    ]
}

fn show(settings: &DisplaySettings, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(settings)?);
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec![
        "Show seconds".to_string(),
        if settings.show_seconds { "on" } else { "off" }.to_string(),
    ]);
    table.add_row(vec!["Pitches".to_string(), settings.pitch_count.to_string()]);
    table.add_row(vec![
        "Scoreboard pitch".to_string(),
        format!("Saha {}", settings.scoreboard_pitch + 1),
    ]);
    let keys = &settings.key_bindings;
    table.add_row(vec![
        "Box A keys (+/-)".to_string(),
        format!("{} / {}", keys.a_increment, keys.a_decrement),
    ]);
    table.add_row(vec![
        "Box B keys (+/-)".to_string(),
        format!("{} / {}", keys.b_increment, keys.b_decrement),
    ]);
    table.add_row(color_row(settings, "Clock background", ColorSetting::ClockBackground));
    table.add_row(color_row(settings, "Clock numbers", ColorSetting::ClockNumber));
    table.add_row(color_row(settings, "Counter text", ColorSetting::CounterText));
    table.add_row(color_row(settings, "Counter numbers", ColorSetting::CounterNumber));
    table.add_row(vec![
        "Button delay".to_string(),
        format!("{} s", settings.button_delay),
    ]);
    table.add_row(vec![
        "Shortcut / decrement key".to_string(),
        format!("{} / {}", settings.shortcut_key, settings.decrement_key),
    ]);
    for layout in LayoutSetting::ALL {
        let (min, max) = layout.range();
        table.add_row(vec![
            format!("Size {}", layout.name()),
            format!("{} ({}-{})", settings.size(layout), min, max),
        ]);
    }
    table.add_row(vec!["Notes".to_string(), settings.notes.clone()]);
    println!("{}", table);

    let swatches: Vec<String> = PALETTE
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}:{}", i, c.label.color(terminal_color(c))))
        .collect();
    println!("Palette: {}", swatches.join("  "));
    Ok(())
}

pub fn run(command: SettingsCommands) -> Result<()> {
    let mut ctx = get_context()?;
    require_settings_access(&ctx)?;

    let changed = match command {
        SettingsCommands::Show { json } => return show(ctx.settings.get(), json),
        SettingsCommands::Seconds => {
            let on = ctx.settings.toggle_seconds()?;
            success(&format!("Seconds {}", if on { "on" } else { "off" }));
            "seconds"
        }
        SettingsCommands::Color { setting, direction } => {
            let setting: ColorSetting = setting.parse()?;
            let direction = match direction {
                Side::Left => Direction::Left,
                Side::Right => Direction::Right,
            };
            let index = ctx.settings.cycle_color(setting, direction)?;
            let color = palette_color(index);
            println!("{} {}", "■".color(terminal_color(color)), color.label);
            "color"
        }
        SettingsCommands::Key { slot, value } => {
            let slot: KeySlot = slot.parse()?;
            match ctx.settings.set_key_binding(slot, &value)? {
                Some(key) => success(&format!("Bound to {}", key)),
                None => println!("Empty key ignored."),
            }
            "key"
        }
        SettingsCommands::Delay { seconds } => {
            let stored = ctx.settings.set_button_delay(seconds)?;
            success(&format!("Button delay {} s", stored));
            "delay"
        }
        SettingsCommands::Shortcut { value } => {
            match ctx.settings.set_shortcut_key(&value)? {
                Some(key) => success(&format!("Shortcut key {}", key)),
                None => println!("Empty key ignored."),
            }
            "shortcut"
        }
        SettingsCommands::DecrementKey { value } => {
            match ctx.settings.set_decrement_key(&value)? {
                Some(key) => success(&format!("Decrement key {}", key)),
                None => println!("Empty key ignored."),
            }
            "decrement-key"
        }
        SettingsCommands::Size { element, value } => {
            let layout: LayoutSetting = element.parse()?;
            let stored = ctx.settings.set_size(layout, value)?;
            if i64::from(stored) != value {
                println!("{} is outside {:?}; clamped", value, layout.range());
            }
            success(&format!("{} = {}", layout.name(), stored));
            "size"
        }
        SettingsCommands::Notes { text, clear } => {
            match (text, clear) {
                (_, true) | (None, false) => {
                    ctx.settings.clear_notes()?;
                    success("Notes cleared");
                }
                (Some(text), false) => {
                    ctx.settings.set_notes(&text)?;
                    success("Notes saved");
                }
            }
            "notes"
        }
        SettingsCommands::Pitches { count } => {
            ctx.settings.set_pitch_count(count)?;
            success(&format!("Grid shows {} pitch(es)", count));
            "pitches"
        }
        SettingsCommands::ScoreboardPitch { pitch } => {
            let index = pitch_index(pitch, ctx.settings.get().pitch_count)?;
            ctx.settings.set_scoreboard_pitch(index)?;
            success(&format!("Scoreboard watches Saha {}", pitch));
            "scoreboard-pitch"
        }
        SettingsCommands::Facility { name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Facility name cannot be empty");
            }
            ctx.config.facility_name = name.to_string();
            ctx.config.save(&get_data_dir()?)?;
            success(&format!("Facility name set to {}", name));
            "facility"
        }
        SettingsCommands::Reset { force } => {
            if !force
                && !Confirm::new()
                    .with_prompt("Restore every display setting to its default?")
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }
            ctx.settings.reset()?;
            success("Settings reset");
            "reset"
        }
    };

    log_event(
        &get_logger(),
        LogEvent::new("settings_changed")
            .with_command(format!("settings {}", changed))
            .with_screen("settings"),
    );
    Ok(())
}
