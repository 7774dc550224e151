// Configuration loading and parsing (podium.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "podium.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub draw: DrawConfig,
    pub database: DatabaseConfig,
}

/// Reveal animation settings for `[draw]`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DrawConfig {
    /// Number of highlight ticks before a draw commits. Zero skips the
    /// animation entirely.
    pub ticks: usize,
    /// Milliseconds between ticks.
    pub tick_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: String,
}

impl Default for DrawConfig {
    fn default() -> Self {
        DrawConfig {
            ticks: 25,
            tick_interval_ms: 80,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig {
            path: "podium.db".to_string(),
        }
    }
}

/// Load and validate configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load `podium.toml` from `base_dir`, falling back to built-in defaults
/// when the file is absent. A present-but-invalid file is still an error.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_config_from(&path)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draw.tick_interval_ms == 0 {
        return Err(ConfigError::ValidationError {
            field: "draw.tick_interval_ms".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "database.path".into(),
            message: "must not be empty".into(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("podium_config_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn defaults_when_file_absent() {
        let dir = temp_dir("absent");
        let config = load_config(&dir).expect("should fall back to defaults");
        assert_eq!(config.draw.ticks, 25);
        assert_eq!(config.draw.tick_interval_ms, 80);
        assert_eq!(config.database.path, "podium.db");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn loads_and_overrides_from_file() {
        let dir = temp_dir("override");
        fs::write(
            dir.join(CONFIG_FILE),
            "[draw]\nticks = 10\ntick_interval_ms = 40\n\n[database]\npath = \"session.db\"\n",
        )
        .unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.draw.ticks, 10);
        assert_eq!(config.draw.tick_interval_ms, 40);
        assert_eq!(config.database.path, "session.db");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = temp_dir("partial");
        fs::write(dir.join(CONFIG_FILE), "[draw]\nticks = 5\n").unwrap();

        let config = load_config(&dir).unwrap();
        assert_eq!(config.draw.ticks, 5);
        assert_eq!(config.draw.tick_interval_ms, 80);
        assert_eq!(config.database.path, "podium.db");
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn zero_ticks_is_allowed() {
        let dir = temp_dir("zero_ticks");
        fs::write(dir.join(CONFIG_FILE), "[draw]\nticks = 0\n").unwrap();
        let config = load_config(&dir).unwrap();
        assert_eq!(config.draw.ticks, 0);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_zero_tick_interval() {
        let dir = temp_dir("zero_interval");
        fs::write(dir.join(CONFIG_FILE), "[draw]\ntick_interval_ms = 0\n").unwrap();

        let err = load_config(&dir).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "draw.tick_interval_ms");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn rejects_empty_database_path() {
        let dir = temp_dir("empty_db");
        fs::write(dir.join(CONFIG_FILE), "[database]\npath = \"\"\n").unwrap();

        let err = load_config(&dir).unwrap_err();
        match &err {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "database.path");
            }
            other => panic!("expected ValidationError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let dir = temp_dir("invalid");
        fs::write(dir.join(CONFIG_FILE), "this is not valid [[[ toml").unwrap();

        let err = load_config(&dir).unwrap_err();
        match &err {
            ConfigError::ParseError { path, .. } => {
                assert!(path.ends_with(CONFIG_FILE));
            }
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_not_found_for_explicit_path() {
        let dir = temp_dir("explicit");
        let err = load_config_from(&dir.join("missing.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound { .. }));
        let _ = fs::remove_dir_all(&dir);
    }
}
