//! Display settings - one load/save boundary for every preference

use std::sync::Arc;

use crate::domain::cell::{validate_pitch, validate_pitch_count};
use crate::domain::result::{Error, Result};
use crate::domain::{ColorSetting, Direction, DisplaySettings, KeySlot, LayoutSetting};
use crate::ports::KeyValueStore;

use super::persisted::Persisted;

/// Storage key of the display settings
pub const DISPLAY_SETTINGS_KEY: &str = "display_settings";

pub struct SettingsService {
    settings: Persisted<DisplaySettings>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Result<Self> {
        Ok(Self {
            settings: Persisted::load(store, DISPLAY_SETTINGS_KEY, DisplaySettings::default)?,
        })
    }

    pub fn get(&self) -> &DisplaySettings {
        self.settings.get()
    }

    /// Returns the new value
    pub fn toggle_seconds(&mut self) -> Result<bool> {
        self.settings.update(|s| {
            s.show_seconds = !s.show_seconds;
            s.show_seconds
        })
    }

    /// Step a palette slider; returns the new palette index
    pub fn cycle_color(&mut self, setting: ColorSetting, direction: Direction) -> Result<u8> {
        self.settings.update(|s| s.cycle_color(setting, direction))
    }

    /// Rebind a counter key to the last character of `input`
    ///
    /// Blank input leaves the binding alone and returns `None`.
    pub fn set_key_binding(&mut self, slot: KeySlot, input: &str) -> Result<Option<char>> {
        self.settings.update(|s| {
            s.key_bindings
                .bind(slot, input)
                .then(|| s.key_bindings.get(slot))
        })
    }

    /// Clamped to 1..=10 seconds; returns the stored value
    pub fn set_button_delay(&mut self, seconds: i64) -> Result<u32> {
        self.settings.update(|s| s.set_button_delay(seconds))
    }

    pub fn set_shortcut_key(&mut self, input: &str) -> Result<Option<String>> {
        self.settings.update(|s| s.set_shortcut_key(input))
    }

    pub fn set_decrement_key(&mut self, input: &str) -> Result<Option<String>> {
        self.settings.update(|s| s.set_decrement_key(input))
    }

    /// Clamped into the element's range; returns the stored value
    pub fn set_size(&mut self, setting: LayoutSetting, value: i64) -> Result<u32> {
        self.settings.update(|s| s.set_size(setting, value))
    }

    pub fn set_notes(&mut self, notes: &str) -> Result<()> {
        let notes = notes.to_string();
        self.settings.update(move |s| s.notes = notes)
    }

    pub fn clear_notes(&mut self) -> Result<()> {
        self.settings.update(|s| s.notes.clear())
    }

    /// Change how many pitches the grid shows
    ///
    /// The scoreboard pitch is pulled back onto the last pitch if it falls
    /// outside the new range.
    pub fn set_pitch_count(&mut self, count: u8) -> Result<()> {
        validate_pitch_count(count)?;
        self.settings.update(|s| {
            s.pitch_count = count;
            s.scoreboard_pitch = s.scoreboard_pitch.min(count - 1);
        })
    }

    /// Pitch (zero-based) the standalone scoreboard watches
    pub fn set_scoreboard_pitch(&mut self, pitch_index: u8) -> Result<()> {
        let count = self.settings.get().pitch_count;
        validate_pitch(pitch_index, count)
            .map_err(|e| Error::validation(format!("scoreboard pitch: {}", e)))?;
        self.settings.update(|s| s.scoreboard_pitch = pitch_index)
    }

    pub fn reset(&mut self) -> Result<()> {
        self.settings.set(DisplaySettings::default())
    }

    pub fn reload(&mut self) -> Result<()> {
        self.settings.reload()
    }
}
