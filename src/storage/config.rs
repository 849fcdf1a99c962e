use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::calendar::{CalendarId, UserId};
use crate::template::calendar_filter::DEFAULT_COLOR;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
    pub calendars: CalendarsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CalendarsConfig {
    pub viewer_id: UserId,
    pub default_calendar: Option<CalendarId>,
    pub default_color: String,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    pub fn load_or_create() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("teamcal")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = Self::config_dir();

        Self {
            storage: StorageConfig {
                database_path: config_dir.join("teamcal.db"),
            },
            logging: LoggingConfig {
                directory: config_dir,
                level: "info".to_string(),
            },
            calendars: CalendarsConfig {
                viewer_id: 1,
                default_calendar: None,
                default_color: DEFAULT_COLOR.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_logs_at_info() {
        let config = Config::default();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn default_config_stores_database_next_to_config() {
        let config = Config::default();
        assert_eq!(config.storage.database_path, Config::config_dir().join("teamcal.db"));
    }

    #[test]
    fn default_config_uses_default_color() {
        let config = Config::default();
        assert_eq!(config.calendars.default_color, DEFAULT_COLOR);
        assert_eq!(config.calendars.default_calendar, None);
    }

    #[test]
    fn parse_valid_toml_config() {
        let toml_content = r##"
            [storage]
            database_path = "/var/lib/teamcal/teamcal.db"

            [logging]
            directory = "/var/log/teamcal"
            level = "debug"

            [calendars]
            viewer_id = 42
            default_calendar = 3
            default_color = "#1a73e8"
        "##;

        let config = Config::from_toml(toml_content).unwrap();

        assert_eq!(config.storage.database_path, PathBuf::from("/var/lib/teamcal/teamcal.db"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.calendars.viewer_id, 42);
        assert_eq!(config.calendars.default_calendar, Some(3));
    }

    #[test]
    fn parse_invalid_toml_returns_error() {
        let invalid_toml = "this is not valid toml";
        let result = Config::from_toml(invalid_toml);
        assert!(result.is_err());
    }

    #[test]
    fn saved_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.calendars.viewer_id = 7;
        config.calendars.default_calendar = Some(2);

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn loading_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();

        let result = Config::load_from(&dir.path().join("missing.toml"));

        assert!(matches!(result, Err(ConfigError::ReadError(_))));
    }
}
