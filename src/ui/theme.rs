use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::Deserialize;

use crate::config::Config;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const FALLBACK_THEME: &str = "terminal-default";

#[derive(Clone, Debug, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

/// Hex colors (`#rrggbb`) or the empty string for the terminal's own color.
#[derive(Clone, Debug, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_typed: String,
    pub text_current_bg: String,
    pub text_current_fg: String,
    pub text_remaining: String,
    pub key_bg: String,
    pub key_active: String,
    pub key_shake: String,
    pub finger_active: String,
    pub accent: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// A theme from `<config_dir>/keycourse/themes/`, else a bundled one.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        let user_path = Config::config_dir().join("themes").join(&filename);
        if let Ok(content) = fs::read_to_string(&user_path) {
            match toml::from_str::<Theme>(&content) {
                Ok(theme) => return Some(theme),
                Err(err) => log::warn!("ignoring theme {}: {err}", user_path.display()),
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        match toml::from_str::<Theme>(content) {
            Ok(theme) => Some(theme),
            Err(err) => {
                log::warn!("bundled theme {name} is invalid: {err}");
                None
            }
        }
    }

    /// Named theme, falling back to the terminal's colors.
    pub fn resolve(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            log::warn!("theme {name:?} not found, using {FALLBACK_THEME}");
            Self::default()
        })
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(FALLBACK_THEME).unwrap_or_else(|| Self {
            name: FALLBACK_THEME.to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: String::new(),
            fg: String::new(),
            text_typed: "#5faf5f".to_string(),
            text_current_bg: "#d0d0d0".to_string(),
            text_current_fg: "#000000".to_string(),
            text_remaining: "#808080".to_string(),
            key_bg: String::new(),
            key_active: "#5f87d7".to_string(),
            key_shake: "#d75f5f".to_string(),
            finger_active: "#d7af5f".to_string(),
            accent: "#5f87d7".to_string(),
            border: "#585858".to_string(),
            border_focused: "#5f87d7".to_string(),
            header_bg: String::new(),
            header_fg: String::new(),
            bar_filled: "#5f87d7".to_string(),
            bar_empty: "#3a3a3a".to_string(),
            error: "#d75f5f".to_string(),
            warning: "#d7af5f".to_string(),
            success: "#5faf5f".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::Reset
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_typed(&self) -> Color { Self::parse_color(&self.text_typed) }
    pub fn text_current_bg(&self) -> Color { Self::parse_color(&self.text_current_bg) }
    pub fn text_current_fg(&self) -> Color { Self::parse_color(&self.text_current_fg) }
    pub fn text_remaining(&self) -> Color { Self::parse_color(&self.text_remaining) }
    pub fn key_bg(&self) -> Color { Self::parse_color(&self.key_bg) }
    pub fn key_active(&self) -> Color { Self::parse_color(&self.key_active) }
    pub fn key_shake(&self) -> Color { Self::parse_color(&self.key_shake) }
    pub fn finger_active(&self) -> Color { Self::parse_color(&self.finger_active) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}
