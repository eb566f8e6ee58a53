use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Stores user-configurable shell preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    /// List transactions most recent first.
    #[serde(default = "Config::default_true")]
    pub newest_first: bool,
    #[serde(default = "Config::default_true")]
    pub ui_color_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for the ledger store. Defaults to `<home>/ledger`.
    pub data_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional directory for CSV exports. Defaults to the working directory.
    pub export_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            newest_first: true,
            ui_color_enabled: true,
            data_dir: None,
            export_dir: None,
        }
    }
}

impl Config {
    /// Keys accepted by [`Config::set`], in display order.
    pub const KEYS: [&'static str; 5] = [
        "currency_symbol",
        "newest_first",
        "ui_color_enabled",
        "data_dir",
        "export_dir",
    ];

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    fn default_true() -> bool {
        true
    }

    pub fn resolve_data_dir(&self, home: &Path) -> PathBuf {
        match &self.data_dir {
            Some(path) => path.clone(),
            None => home.join("ledger"),
        }
    }

    pub fn resolve_export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Current value of `key` rendered for display.
    pub fn get(&self, key: &str) -> Result<String, ConfigError> {
        let value = match key {
            "currency_symbol" => self.currency_symbol.clone(),
            "newest_first" => self.newest_first.to_string(),
            "ui_color_enabled" => self.ui_color_enabled.to_string(),
            "data_dir" => display_path(self.data_dir.as_deref()),
            "export_dir" => display_path(self.export_dir.as_deref()),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        };
        Ok(value)
    }

    /// Parses `value` into the field named `key`. `none` clears optional paths.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match key {
            "currency_symbol" => {
                if value.is_empty() {
                    return Err(invalid(key, "currency symbol cannot be empty"));
                }
                self.currency_symbol = value.to_string();
            }
            "newest_first" => self.newest_first = parse_bool(key, value)?,
            "ui_color_enabled" => self.ui_color_enabled = parse_bool(key, value)?,
            "data_dir" => self.data_dir = parse_path(value),
            "export_dir" => self.export_dir = parse_path(value),
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}

fn display_path(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "(default)".into())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}

fn parse_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.to_string(),
    }
}
