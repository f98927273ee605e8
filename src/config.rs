use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dialog::{DialogSettings, FieldLimits};
use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

/// Default maximum length of a task name, in characters
pub const TASK_NAME_MAX_LENGTH: usize = 40;

/// Default maximum length of a task description, in characters
pub const DESCRIPTION_MAX_LENGTH: usize = 250;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_categories_enabled")]
    pub categories_enabled: bool,
    #[serde(default)]
    pub limits: Limits,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Limits {
    #[serde(default = "default_task_name_max_length")]
    pub task_name_max_length: usize,
    #[serde(default = "default_description_max_length")]
    pub description_max_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_edit")]
    pub edit: String,
    #[serde(default = "default_save")]
    pub save: String,
    #[serde(default = "default_clear_deadline")]
    pub clear_deadline: String,
    #[serde(default = "default_paste")]
    pub paste: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_toggle_categories")]
    pub toggle_categories: String,
    #[serde(default = "default_help")]
    pub help: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_error_fg")]
    pub error_fg: String,
    #[serde(default = "default_muted_fg")]
    pub muted_fg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            categories_enabled: default_categories_enabled(),
            limits: Limits::default(),
            key_bindings: KeyBindings::default(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            log_level: default_log_level(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            task_name_max_length: default_task_name_max_length(),
            description_max_length: default_description_max_length(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            edit: default_edit(),
            save: default_save(),
            clear_deadline: default_clear_deadline(),
            paste: default_paste(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            toggle_categories: default_toggle_categories(),
            help: default_help(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            error_fg: default_error_fg(),
            muted_fg: default_muted_fg(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            error_fg: "red".to_string(),
            muted_fg: "darkgray".to_string(),
        });

        themes.insert("purple".to_string(), Theme {
            fg: "white".to_string(),
            bg: "black".to_string(),
            highlight_bg: "#b624ff".to_string(),
            error_fg: "lightred".to_string(),
            muted_fg: "gray".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    // Fallback only; the profile-specific path is set at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("taskpad.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/taskpad/taskpad.db".to_string()
    }
}

fn default_categories_enabled() -> bool {
    true
}

fn default_task_name_max_length() -> usize {
    TASK_NAME_MAX_LENGTH
}

fn default_description_max_length() -> usize {
    DESCRIPTION_MAX_LENGTH
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_edit() -> String {
    "e".to_string()
}

fn default_save() -> String {
    "Ctrl+s".to_string()
}

fn default_clear_deadline() -> String {
    "Ctrl+d".to_string()
}

fn default_paste() -> String {
    "Ctrl+v".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_toggle_categories() -> String {
    "c".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_error_fg() -> String {
    "lightred".to_string()
}

fn default_muted_fg() -> String {
    "darkgray".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
}

impl Config {
    /// Load configuration for a profile, or create the default file if missing.
    /// `override_path` replaces the profile's config.toml location.
    pub fn load_with_profile(profile: utils::Profile, override_path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = match override_path {
            Some(path) => path.to_path_buf(),
            None => Self::get_config_path(profile)?,
        };

        if config_path.exists() {
            let contents = fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let mut config = Self::from_toml(&contents)?;

            // A dev profile must never point at the prod database
            if profile == utils::Profile::Dev {
                config.database_path = Self::default_database_path_for_profile(profile);
            }

            Ok(config)
        } else {
            let mut config = Config::default();
            config.database_path = Self::default_database_path_for_profile(profile);
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Parse a configuration document; missing keys fall back to defaults
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("taskpad.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/taskpad-dev/taskpad.db".to_string(),
                utils::Profile::Prod => "~/.local/share/taskpad/taskpad.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    /// Settings handed to the edit dialog
    pub fn dialog_settings(&self) -> DialogSettings {
        DialogSettings {
            categories_enabled: self.categories_enabled,
            limits: FieldLimits {
                task_name_max_length: self.limits.task_name_max_length,
                description_max_length: self.limits.description_max_length,
            },
        }
    }

    /// Log level filter from config; unknown values fall back to Info
    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    /// Get the currently active theme (user-defined first, then presets)
    pub fn get_active_theme(&self) -> Theme {
        if let Some(theme) = self.themes.get(&self.current_theme) {
            theme.clone()
        } else if let Some(theme) = Theme::get_preset_themes().remove(&self.current_theme) {
            theme
        } else {
            Theme::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert!(config.categories_enabled);
        assert_eq!(config.limits.task_name_max_length, TASK_NAME_MAX_LENGTH);
        assert_eq!(config.limits.description_max_length, DESCRIPTION_MAX_LENGTH);
        assert_eq!(config.key_bindings.save, "Ctrl+s");
        assert_eq!(config.log_level_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let config = Config::from_toml(
            "categories_enabled = false\nlog_level = \"debug\"\n[limits]\ntask_name_max_length = 12\n",
        )
        .unwrap();
        let settings = config.dialog_settings();
        assert!(!settings.categories_enabled);
        assert_eq!(settings.limits.task_name_max_length, 12);
        assert_eq!(settings.limits.description_max_length, DESCRIPTION_MAX_LENGTH);
        assert_eq!(config.log_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn active_theme_falls_back_to_presets_then_default() {
        let mut config = Config::default();
        config.current_theme = "light".to_string();
        assert_eq!(config.get_active_theme().bg, "white");

        config.current_theme = "nope".to_string();
        assert_eq!(config.get_active_theme(), Theme::default());
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = std::env::temp_dir().join(format!("taskpad-config-test-{}", std::process::id()));
        let path = dir.join("config.toml");
        let mut config = Config::default();
        config.categories_enabled = false;
        config.save_to(&path).unwrap();

        let loaded = Config::load_with_profile(utils::Profile::Prod, Some(path.as_path())).unwrap();
        assert!(!loaded.categories_enabled);
        let _ = fs::remove_dir_all(&dir);
    }
}
