//! Display preferences for the scoreboard and settings panel
//!
//! All preferences live in one structure with a single load/save boundary
//! (see `SettingsService`). Field names match the persisted JSON.

use serde::{Deserialize, Serialize};

use super::cell::validate_pitch_count;
use super::result::{Error, Result};

/// One entry of the fixed color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteColor {
    /// Stable English name
    pub name: &'static str,
    /// Name shown to staff
    pub label: &'static str,
    /// Background token
    pub bg: &'static str,
    /// Text token
    pub text: &'static str,
}

/// The nine selectable colors, in slider order
pub const PALETTE: [PaletteColor; 9] = [
    PaletteColor { name: "red", label: "Kırmızı", bg: "bg-red-600", text: "text-red-600" },
    PaletteColor { name: "blue", label: "Mavi", bg: "bg-blue-600", text: "text-blue-600" },
    PaletteColor { name: "green", label: "Yeşil", bg: "bg-green-600", text: "text-green-600" },
    PaletteColor { name: "purple", label: "Mor", bg: "bg-purple-600", text: "text-purple-600" },
    PaletteColor { name: "orange", label: "Turuncu", bg: "bg-orange-600", text: "text-orange-600" },
    PaletteColor { name: "pink", label: "Pembe", bg: "bg-pink-600", text: "text-pink-600" },
    PaletteColor { name: "yellow", label: "Sarı", bg: "bg-yellow-600", text: "text-yellow-600" },
    PaletteColor { name: "gray", label: "Gri", bg: "bg-gray-600", text: "text-gray-600" },
    PaletteColor { name: "white", label: "Beyaz", bg: "bg-white", text: "text-white" },
];

/// Palette entry at `index`, clamped to the last color
pub fn palette_color(index: u8) -> &'static PaletteColor {
    &PALETTE[(index as usize).min(PALETTE.len() - 1)]
}

/// Which colored element a palette change applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSetting {
    ClockBackground,
    ClockNumber,
    CounterText,
    CounterNumber,
}

impl std::str::FromStr for ColorSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "clock-bg" | "clock-background" => Ok(ColorSetting::ClockBackground),
            "clock-number" => Ok(ColorSetting::ClockNumber),
            "counter-text" => Ok(ColorSetting::CounterText),
            "counter-number" => Ok(ColorSetting::CounterNumber),
            other => Err(Error::validation(format!(
                "unknown color setting '{}' (expected clock-bg, clock-number, counter-text or counter-number)",
                other
            ))),
        }
    }
}

/// Bounds of the button delay, in seconds
pub const BUTTON_DELAY_RANGE: (u32, u32) = (1, 10);

/// The eight layout sizes of the scoreboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutSetting {
    CounterWidth,
    CounterHeight,
    ClockWidth,
    ClockHeight,
    ClockFontWidth,
    ClockFontHeight,
    CounterFontWidth,
    CounterFontHeight,
}

impl LayoutSetting {
    pub const ALL: [LayoutSetting; 8] = [
        LayoutSetting::CounterWidth,
        LayoutSetting::CounterHeight,
        LayoutSetting::ClockWidth,
        LayoutSetting::ClockHeight,
        LayoutSetting::ClockFontWidth,
        LayoutSetting::ClockFontHeight,
        LayoutSetting::CounterFontWidth,
        LayoutSetting::CounterFontHeight,
    ];

    /// Inclusive bounds of the size
    pub fn range(self) -> (u32, u32) {
        match self {
            LayoutSetting::CounterWidth => (100, 2000),
            LayoutSetting::CounterHeight => (100, 1000),
            LayoutSetting::ClockWidth => (50, 200),
            LayoutSetting::ClockHeight => (50, 500),
            LayoutSetting::ClockFontWidth | LayoutSetting::ClockFontHeight => (5, 50),
            LayoutSetting::CounterFontWidth | LayoutSetting::CounterFontHeight => (50, 800),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayoutSetting::CounterWidth => "counter-width",
            LayoutSetting::CounterHeight => "counter-height",
            LayoutSetting::ClockWidth => "clock-width",
            LayoutSetting::ClockHeight => "clock-height",
            LayoutSetting::ClockFontWidth => "clock-font-width",
            LayoutSetting::ClockFontHeight => "clock-font-height",
            LayoutSetting::CounterFontWidth => "counter-font-width",
            LayoutSetting::CounterFontHeight => "counter-font-height",
        }
    }
}

impl std::str::FromStr for LayoutSetting {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        LayoutSetting::ALL
            .into_iter()
            .find(|setting| setting.name() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = LayoutSetting::ALL.iter().map(|l| l.name()).collect();
                Error::validation(format!(
                    "unknown size '{}' (expected one of {})",
                    wanted,
                    names.join(", ")
                ))
            })
    }
}

fn clamp_to(value: i64, (min, max): (u32, u32)) -> u32 {
    value.clamp(i64::from(min), i64::from(max)) as u32
}

/// Uppercased last character of `input`; a trailing space is stored as "Space"
fn shortcut_from(input: &str) -> Option<String> {
    match input.chars().last()? {
        ' ' => Some("Space".to_string()),
        c if c.is_whitespace() => None,
        c => Some(c.to_uppercase().collect()),
    }
}

/// Slider direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// The four scoreboard counter shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    AIncrement,
    ADecrement,
    BIncrement,
    BDecrement,
}

impl std::str::FromStr for KeySlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "a-increment" | "a-inc" => Ok(KeySlot::AIncrement),
            "a-decrement" | "a-dec" => Ok(KeySlot::ADecrement),
            "b-increment" | "b-inc" => Ok(KeySlot::BIncrement),
            "b-decrement" | "b-dec" => Ok(KeySlot::BDecrement),
            other => Err(Error::validation(format!("unknown key slot '{}'", other))),
        }
    }
}

/// Single-character shortcuts for the two counter boxes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyBindings {
    pub a_increment: char,
    pub a_decrement: char,
    pub b_increment: char,
    pub b_decrement: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            a_increment: 'Q',
            a_decrement: 'A',
            b_increment: 'P',
            b_decrement: 'L',
        }
    }
}

impl KeyBindings {
    pub fn get(&self, slot: KeySlot) -> char {
        match slot {
            KeySlot::AIncrement => self.a_increment,
            KeySlot::ADecrement => self.a_decrement,
            KeySlot::BIncrement => self.b_increment,
            KeySlot::BDecrement => self.b_decrement,
        }
    }

    fn slot_mut(&mut self, slot: KeySlot) -> &mut char {
        match slot {
            KeySlot::AIncrement => &mut self.a_increment,
            KeySlot::ADecrement => &mut self.a_decrement,
            KeySlot::BIncrement => &mut self.b_increment,
            KeySlot::BDecrement => &mut self.b_decrement,
        }
    }

    /// Bind `slot` to the last character of `input`, uppercased
    ///
    /// Returns false (and leaves the binding alone) for empty input.
    pub fn bind(&mut self, slot: KeySlot, input: &str) -> bool {
        match input.chars().last() {
            Some(c) if !c.is_whitespace() => {
                *self.slot_mut(slot) = c.to_uppercase().next().unwrap_or(c);
                true
            }
            _ => false,
        }
    }

    /// Find which slot a pressed key belongs to (case-insensitive)
    ///
    /// Slots are checked in A-increment, A-decrement, B-increment,
    /// B-decrement order, so a key bound twice resolves to the first.
    pub fn resolve(&self, key: char) -> Option<KeySlot> {
        let pressed: String = key.to_uppercase().collect();
        [
            KeySlot::AIncrement,
            KeySlot::ADecrement,
            KeySlot::BIncrement,
            KeySlot::BDecrement,
        ]
        .into_iter()
        .find(|slot| self.get(*slot).to_uppercase().collect::<String>() == pressed)
    }
}

/// Every display preference the settings panel manages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DisplaySettings {
    pub show_seconds: bool,
    pub button_delay: u32,
    pub shortcut_key: String,
    pub decrement_key: String,
    pub key_bindings: KeyBindings,

    // Layout
    pub counter_bg_width: u32,
    pub counter_bg_height: u32,
    pub clock_bg_width: u32,
    pub clock_bg_height: u32,
    pub clock_font_width: u32,
    pub clock_font_height: u32,
    pub counter_font_width: u32,
    pub counter_font_height: u32,

    // Palette indices
    pub clock_bg_color: u8,
    pub clock_number_color: u8,
    pub counter_text_color: u8,
    pub counter_number_color: u8,

    /// Free-text staff notes
    pub notes: String,
    /// Number of pitches shown in the booking grid
    pub pitch_count: u8,
    /// Pitch the standalone scoreboard watches for alarms
    pub scoreboard_pitch: u8,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_seconds: true,
            button_delay: 2,
            shortcut_key: "Space".to_string(),
            decrement_key: "X".to_string(),
            key_bindings: KeyBindings::default(),
            counter_bg_width: 950,
            counter_bg_height: 426,
            clock_bg_width: 100,
            clock_bg_height: 140,
            clock_font_width: 18,
            clock_font_height: 18,
            counter_font_width: 403,
            counter_font_height: 403,
            clock_bg_color: 0,
            clock_number_color: 8,
            counter_text_color: 0,
            counter_number_color: 0,
            notes: String::new(),
            pitch_count: 3,
            scoreboard_pitch: 0,
        }
    }
}

impl DisplaySettings {
    pub fn color_index(&self, setting: ColorSetting) -> u8 {
        match setting {
            ColorSetting::ClockBackground => self.clock_bg_color,
            ColorSetting::ClockNumber => self.clock_number_color,
            ColorSetting::CounterText => self.counter_text_color,
            ColorSetting::CounterNumber => self.counter_number_color,
        }
    }

    /// Token for the element: background token for the clock background,
    /// text token for everything else
    pub fn color_token(&self, setting: ColorSetting) -> &'static str {
        let color = palette_color(self.color_index(setting));
        match setting {
            ColorSetting::ClockBackground => color.bg,
            _ => color.text,
        }
    }

    /// Move the palette slider one step, wrapping at both ends
    pub fn cycle_color(&mut self, setting: ColorSetting, direction: Direction) -> u8 {
        let last = (PALETTE.len() - 1) as u8;
        let slot = match setting {
            ColorSetting::ClockBackground => &mut self.clock_bg_color,
            ColorSetting::ClockNumber => &mut self.clock_number_color,
            ColorSetting::CounterText => &mut self.counter_text_color,
            ColorSetting::CounterNumber => &mut self.counter_number_color,
        };
        let current = (*slot).min(last);
        *slot = match direction {
            Direction::Left if current == 0 => last,
            Direction::Left => current - 1,
            Direction::Right if current == last => 0,
            Direction::Right => current + 1,
        };
        *slot
    }

    pub fn size(&self, setting: LayoutSetting) -> u32 {
        match setting {
            LayoutSetting::CounterWidth => self.counter_bg_width,
            LayoutSetting::CounterHeight => self.counter_bg_height,
            LayoutSetting::ClockWidth => self.clock_bg_width,
            LayoutSetting::ClockHeight => self.clock_bg_height,
            LayoutSetting::ClockFontWidth => self.clock_font_width,
            LayoutSetting::ClockFontHeight => self.clock_font_height,
            LayoutSetting::CounterFontWidth => self.counter_font_width,
            LayoutSetting::CounterFontHeight => self.counter_font_height,
        }
    }

    /// Store `value` clamped into the size's range; returns what was stored
    pub fn set_size(&mut self, setting: LayoutSetting, value: i64) -> u32 {
        let slot = match setting {
            LayoutSetting::CounterWidth => &mut self.counter_bg_width,
            LayoutSetting::CounterHeight => &mut self.counter_bg_height,
            LayoutSetting::ClockWidth => &mut self.clock_bg_width,
            LayoutSetting::ClockHeight => &mut self.clock_bg_height,
            LayoutSetting::ClockFontWidth => &mut self.clock_font_width,
            LayoutSetting::ClockFontHeight => &mut self.clock_font_height,
            LayoutSetting::CounterFontWidth => &mut self.counter_font_width,
            LayoutSetting::CounterFontHeight => &mut self.counter_font_height,
        };
        *slot = clamp_to(value, setting.range());
        *slot
    }

    /// Seconds, clamped to 1..=10
    pub fn set_button_delay(&mut self, seconds: i64) -> u32 {
        self.button_delay = clamp_to(seconds, BUTTON_DELAY_RANGE);
        self.button_delay
    }

    /// Returns the new key, or `None` (unchanged) for blank input
    pub fn set_shortcut_key(&mut self, input: &str) -> Option<String> {
        let key = shortcut_from(input)?;
        self.shortcut_key = key.clone();
        Some(key)
    }

    pub fn set_decrement_key(&mut self, input: &str) -> Option<String> {
        let key = shortcut_from(input)?;
        self.decrement_key = key.clone();
        Some(key)
    }

    pub fn validate(&self) -> Result<()> {
        validate_pitch_count(self.pitch_count)?;
        if self.scoreboard_pitch >= self.pitch_count {
            return Err(Error::validation(format!(
                "scoreboard pitch {} is outside the {} configured pitch(es)",
                self.scoreboard_pitch + 1,
                self.pitch_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_panel() {
        let settings = DisplaySettings::default();
        assert!(settings.show_seconds);
        assert_eq!(settings.color_token(ColorSetting::ClockBackground), "bg-red-600");
        assert_eq!(settings.color_token(ColorSetting::ClockNumber), "text-white");
        assert_eq!(settings.key_bindings.a_increment, 'Q');
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_color_slider_wraps() {
        let mut settings = DisplaySettings::default();
        assert_eq!(settings.cycle_color(ColorSetting::ClockBackground, Direction::Left), 8);
        assert_eq!(settings.cycle_color(ColorSetting::ClockBackground, Direction::Right), 0);
        assert_eq!(settings.cycle_color(ColorSetting::ClockNumber, Direction::Right), 0);
        assert_eq!(settings.cycle_color(ColorSetting::CounterText, Direction::Right), 1);
        assert_eq!(settings.color_token(ColorSetting::CounterText), "text-blue-600");
    }

    #[test]
    fn test_bind_takes_last_character_uppercased() {
        let mut keys = KeyBindings::default();
        assert!(keys.bind(KeySlot::AIncrement, "zw"));
        assert_eq!(keys.a_increment, 'W');
        assert!(!keys.bind(KeySlot::AIncrement, ""));
        assert_eq!(keys.a_increment, 'W');
    }

    #[test]
    fn test_resolve_is_case_insensitive() {
        let keys = KeyBindings::default();
        assert_eq!(keys.resolve('q'), Some(KeySlot::AIncrement));
        assert_eq!(keys.resolve('L'), Some(KeySlot::BDecrement));
        assert_eq!(keys.resolve('z'), None);
    }

    #[test]
    fn test_sizes_are_clamped_per_element() {
        let mut settings = DisplaySettings::default();
        assert_eq!(settings.set_size(LayoutSetting::CounterWidth, 5000), 2000);
        assert_eq!(settings.set_size(LayoutSetting::CounterHeight, 5000), 1000);
        assert_eq!(settings.set_size(LayoutSetting::ClockWidth, 10), 50);
        assert_eq!(settings.set_size(LayoutSetting::ClockHeight, 320), 320);
        assert_eq!(settings.set_size(LayoutSetting::ClockFontHeight, -4), 5);
        assert_eq!(settings.set_size(LayoutSetting::CounterFontWidth, 801), 800);
        assert_eq!(settings.counter_bg_width, 2000);
        assert_eq!(settings.size(LayoutSetting::ClockHeight), 320);
    }

    #[test]
    fn test_layout_names_parse() {
        for setting in LayoutSetting::ALL {
            assert_eq!(setting.name().parse::<LayoutSetting>().unwrap(), setting);
        }
        assert_eq!("CLOCK_FONT_WIDTH".parse::<LayoutSetting>().unwrap(), LayoutSetting::ClockFontWidth);
        assert!("clock-depth".parse::<LayoutSetting>().is_err());
    }

    #[test]
    fn test_button_delay_bounds() {
        let mut settings = DisplaySettings::default();
        assert_eq!(settings.set_button_delay(0), 1);
        assert_eq!(settings.set_button_delay(11), 10);
        assert_eq!(settings.set_button_delay(4), 4);
        assert_eq!(settings.button_delay, 4);
    }

    #[test]
    fn test_shortcut_keys_take_last_character() {
        let mut settings = DisplaySettings::default();
        assert_eq!(settings.set_shortcut_key("ab").as_deref(), Some("B"));
        assert_eq!(settings.set_decrement_key("z").as_deref(), Some("Z"));
        assert_eq!(settings.set_shortcut_key("").as_deref(), None);
        assert_eq!(settings.shortcut_key, "B");
        assert_eq!(settings.set_shortcut_key(" ").as_deref(), Some("Space"));
        assert_eq!(settings.decrement_key, "Z");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings: DisplaySettings = serde_json::from_str(r#"{"showSeconds": false}"#).unwrap();
        assert!(!settings.show_seconds);
        assert_eq!(settings.pitch_count, 3);
    }
}
