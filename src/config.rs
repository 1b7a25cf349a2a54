//! Server and game configuration
//!
//! Values come from a TOML file when one is available, otherwise the defaults
//! below apply. Every section is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::room::directory::is_valid_room_name;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "PIXELWAR_CONFIG";

/// Config file picked up from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "pixelwar.toml";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Rules shared by every room on this server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub canvas_width: usize,
    pub canvas_height: usize,
    pub max_players: usize,
    /// Active sessions needed before the clock starts
    pub min_players: usize,
    pub duration_secs: u32,
    /// Minimum delay between two placements of one session
    pub cooldown_ms: u64,
    /// Seconds between snapshot writes while the clock runs
    pub checkpoint_interval_secs: u32,
    pub default_room: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: 100,
            canvas_height: 100,
            max_players: 8,
            min_players: 2,
            duration_secs: 300,
            cooldown_ms: 1000,
            checkpoint_interval_secs: 10,
            default_room: "default".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/rooms"),
        }
    }
}

impl Config {
    /// Load from `$PIXELWAR_CONFIG`, then `pixelwar.toml`, then defaults
    pub fn load() -> Result<Self, ConfigError> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_file(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::load_file(DEFAULT_CONFIG_FILE);
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;

        if game.canvas_width == 0 || game.canvas_height == 0 {
            return Err(ConfigError::Validation(
                "canvas dimensions must be non-zero".to_string(),
            ));
        }

        if game.min_players == 0 || game.min_players > game.max_players {
            return Err(ConfigError::Validation(format!(
                "min_players ({}) must be between 1 and max_players ({})",
                game.min_players, game.max_players
            )));
        }

        if game.duration_secs == 0 {
            return Err(ConfigError::Validation(
                "duration_secs must be non-zero".to_string(),
            ));
        }

        if game.checkpoint_interval_secs == 0 {
            return Err(ConfigError::Validation(
                "checkpoint_interval_secs must be non-zero".to_string(),
            ));
        }

        if !is_valid_room_name(&game.default_room) {
            return Err(ConfigError::Validation(format!(
                "invalid default room name '{}'",
                game.default_room
            )));
        }

        Ok(())
    }
}
