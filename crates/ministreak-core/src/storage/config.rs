//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Streak policy knobs (starting freeze credits, experience per day)
//! - Notification toggles
//! - Display color for the decorated streak prefix
//! - Tick cadence for the watch loop
//! - Message detection rules for both sub-tasks
//!
//! Configuration is stored at `~/.config/ministreak/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::detect::{DetectionRules, MatchRule};
use crate::error::{ConfigError, CoreError};
use crate::streak::DEFAULT_XP_PER_COMPLETION;

/// Streak policy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreakConfig {
    /// Freeze credits granted to a profile that has never stored a count.
    #[serde(default = "default_initial_freeze_count")]
    pub initial_freeze_count: u32,
    #[serde(default = "default_xp_per_completion")]
    pub xp_per_completion: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Master switch for every message below.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// "Halfway done" after the first sub-task of the day.
    #[serde(default = "default_true")]
    pub halfway: bool,
    /// "Daily Mini Complete!" when the streak is credited.
    #[serde(default = "default_true")]
    pub day_complete: bool,
    /// Once-per-day reminder on rollover or resume.
    #[serde(default = "default_true")]
    pub daily_reminder: bool,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Hex color (no `#`) used for the streak number prefix.
    #[serde(default = "default_streak_color")]
    pub streak_color: String,
}

/// Tick source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

/// Message detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionConfig {
    #[serde(default = "default_label_a")]
    pub label_a: String,
    #[serde(default = "default_label_b")]
    pub label_b: String,
    #[serde(default = "MatchRule::birdhouse")]
    pub sub_task_a: MatchRule,
    #[serde(default = "MatchRule::herb_patch")]
    pub sub_task_b: MatchRule,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/ministreak/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub streak: StreakConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub tick: TickConfig,
    #[serde(default)]
    pub detection: DetectionConfig,
}

// Default functions
fn default_initial_freeze_count() -> u32 {
    1
}
fn default_xp_per_completion() -> u32 {
    DEFAULT_XP_PER_COMPLETION
}
fn default_true() -> bool {
    true
}
fn default_streak_color() -> String {
    "ffd700".into()
}
fn default_interval_ms() -> u64 {
    600
}
fn default_label_a() -> String {
    "Birdhouse run".into()
}
fn default_label_b() -> String {
    "Herb run".into()
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            initial_freeze_count: default_initial_freeze_count(),
            xp_per_completion: default_xp_per_completion(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            halfway: true,
            day_complete: true,
            daily_reminder: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            streak_color: default_streak_color(),
        }
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            label_a: default_label_a(),
            label_b: default_label_b(),
            sub_task_a: MatchRule::birdhouse(),
            sub_task_b: MatchRule::herb_patch(),
        }
    }
}

impl DetectionConfig {
    pub fn rules(&self) -> DetectionRules {
        DetectionRules::new(self.sub_task_a.clone(), self.sub_task_b.clone())
    }
}

impl NotificationsConfig {
    pub fn halfway_enabled(&self) -> bool {
        self.enabled && self.halfway
    }

    pub fn day_complete_enabled(&self) -> bool {
        self.enabled && self.day_complete
    }

    pub fn daily_reminder_enabled(&self) -> bool {
        self.enabled && self.daily_reminder
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, creating it with defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, creating it with defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed, or if the
    /// default config cannot be written.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}
