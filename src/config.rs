use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Course file to load instead of the bundled course.
    #[serde(default)]
    pub course: Option<PathBuf>,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_locale")]
    pub locale: String,
    /// How long a key stays marked after a wrong keystroke.
    #[serde(default = "default_shake_ms")]
    pub shake_ms: u64,
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keycourse")
}
fn default_locale() -> String {
    "en".to_string()
}
fn default_shake_ms() -> u64 {
    300
}
fn default_log_file() -> PathBuf {
    default_data_dir().join("keycourse.log")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            course: None,
            data_dir: default_data_dir(),
            locale: default_locale(),
            shake_ms: default_shake_ms(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("keycourse")
    }

    /// Apply command-line overrides on top of the file values.
    pub fn merge_cli(
        &mut self,
        course: Option<PathBuf>,
        theme: Option<String>,
        data_dir: Option<PathBuf>,
        locale: Option<String>,
    ) {
        if course.is_some() {
            self.course = course;
        }
        if let Some(theme) = theme {
            self.theme = theme;
        }
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        if let Some(locale) = locale {
            self.locale = locale;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.course, None);
        assert_eq!(config.locale, "en");
        assert_eq!(config.shake_ms, 300);
        assert!(config.data_dir.ends_with("keycourse"));
        assert!(config.log_file.ends_with("keycourse.log"));
    }

    #[test]
    fn test_config_partial_file_keeps_other_defaults() {
        let toml_str = r#"
theme = "catppuccin-mocha"
course = "/tmp/course.toml"
shake_ms = 500
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.theme, "catppuccin-mocha");
        assert_eq!(config.course, Some(PathBuf::from("/tmp/course.toml")));
        assert_eq!(config.shake_ms, 500);
        assert_eq!(config.locale, "en");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_cli_overrides_only_given_values() {
        let mut config = Config::default();
        config.merge_cli(
            Some(PathBuf::from("c.toml")),
            None,
            Some(PathBuf::from("/data")),
            None,
        );
        assert_eq!(config.course, Some(PathBuf::from("c.toml")));
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.data_dir, PathBuf::from("/data"));
        assert_eq!(config.locale, "en");
    }
}
