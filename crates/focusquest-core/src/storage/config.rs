//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Daily focus goal
//! - Timer presets and default duration
//! - Notification preferences
//!
//! Configuration is stored at `~/.config/focusquest/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::timer::{DEFAULT_MINUTES, DEFAULT_PRESETS};

/// Daily-goal configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_daily_minutes")]
    pub daily_minutes: u32,
}

/// Timer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Preset menu, in minutes.
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
    #[serde(default = "default_timer_minutes")]
    pub default_minutes: u32,
}

/// Notification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub celebrate_level_up: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/focusquest/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub goal: GoalConfig,
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
}

// Default functions
fn default_daily_minutes() -> u32 {
    60
}
fn default_timer_minutes() -> u32 {
    DEFAULT_MINUTES
}
fn default_presets() -> Vec<u32> {
    DEFAULT_PRESETS.to_vec()
}
fn default_true() -> bool {
    true
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            daily_minutes: default_daily_minutes(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            presets: default_presets(),
            default_minutes: default_timer_minutes(),
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            celebrate_level_up: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            goal: GoalConfig::default(),
            timer: TimerConfig::default(),
            notifications: NotificationsConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load the configuration, falling back to defaults when the file
    /// does not exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::LoadFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Persist the configuration.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        std::fs::write(&path, raw).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Read a value by dotted path, e.g. `goal.daily_minutes`.
    pub fn get(&self, key: &str) -> Result<serde_json::Value, ConfigError> {
        let root = serde_json::to_value(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        let mut current = &root;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }
        Ok(current.clone())
    }

    /// Set a value by dotted path, coercing the string to the existing
    /// value's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut root =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;

        {
            let mut parts = key.split('.').peekable();
            let mut current = &mut root;
            while let Some(part) = parts.next() {
                let is_leaf = parts.peek().is_none();
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let slot = obj
                    .get_mut(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                if is_leaf {
                    *slot = coerce(slot, value, key)?;
                    break;
                }
                current = slot;
            }
        }

        *self = serde_json::from_value(root).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

/// Parse `value` into the same JSON shape as `existing`.
fn coerce(
    existing: &serde_json::Value,
    value: &str,
    key: &str,
) -> Result<serde_json::Value, ConfigError> {
    let invalid = |message: String| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    };
    match existing {
        serde_json::Value::Bool(_) => value
            .parse::<bool>()
            .map(serde_json::Value::Bool)
            .map_err(|e| invalid(e.to_string())),
        serde_json::Value::Number(_) => {
            if let Ok(n) = value.parse::<u64>() {
                Ok(serde_json::Value::Number(n.into()))
            } else {
                Err(invalid(format!("cannot parse '{value}' as number")))
            }
        }
        serde_json::Value::Array(_) => {
            serde_json::from_str(value).map_err(|e| invalid(e.to_string()))
        }
        _ => Ok(serde_json::Value::String(value.into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_preset_menu() {
        let config = Config::default();
        assert_eq!(config.goal.daily_minutes, 60);
        assert_eq!(config.timer.presets, vec![15, 25, 45, 60]);
        assert_eq!(config.timer.default_minutes, 25);
        assert!(config.notifications.enabled);
    }

    #[test]
    fn dotted_get_and_set_round_trip() {
        let mut config = Config::default();
        config.set("goal.daily_minutes", "90").unwrap();
        assert_eq!(config.goal.daily_minutes, 90);
        assert_eq!(config.get("goal.daily_minutes").unwrap(), 90);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut config = Config::default();
        assert!(config.set("goal.nope", "1").is_err());
        assert!(config.get("nope").is_err());
    }

    #[test]
    fn bool_coercion_rejects_garbage() {
        let mut config = Config::default();
        assert!(config.set("notifications.enabled", "false").is_ok());
        assert!(!config.notifications.enabled);
        assert!(config.set("notifications.enabled", "banana").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default();
        let raw = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&raw).unwrap();
        assert_eq!(back.timer.presets, config.timer.presets);
    }
}
