use std::env;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Configuration for the satchel data core
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path or URI of the SQLite database
    pub database_url: String,
    /// How long a connection waits on a locked database, in milliseconds
    pub busy_timeout_ms: u64,
}

/// Update structure for Config with all fields optional
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigUpdate {
    /// Optional update for the database URL
    #[serde(default)]
    pub database_url: Option<String>,
    /// Optional update for the busy timeout (in milliseconds)
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl Config {
    /// Applies a config update to the current configuration
    pub fn apply_update(self, update: ConfigUpdate) -> Self {
        Self {
            database_url: update.database_url.unwrap_or(self.database_url),
            busy_timeout_ms: update.busy_timeout_ms.unwrap_or(self.busy_timeout_ms),
        }
    }
}

/// Returns the base (default) configuration
///
/// `data_path` is the directory the database file lands in; without one
/// the file is created relative to the working directory.
pub fn base_config(data_path: Option<PathBuf>) -> Config {
    let database_url = data_path.map_or("satchel.db".to_string(), |path| {
        path.join("satchel.db").to_string_lossy().to_string()
    });

    Config {
        database_url,
        busy_timeout_ms: 5000,
    }
}

/// Loads configuration from a TOML file
pub fn config_from_file(config_path: Option<PathBuf>) -> Result<ConfigUpdate, String> {
    let Some(config_path) = config_path else {
        return Ok(ConfigUpdate::default());
    };

    if !config_path.exists() {
        info!("Config file not found at {:?}, using defaults", config_path);
        return Ok(ConfigUpdate::default());
    }

    match fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str::<ConfigUpdate>(&content) {
            Ok(config) => {
                info!("Loaded configuration from {:?}", config_path);
                Ok(config)
            }
            Err(e) => {
                warn!("Failed to parse config file: {}", e);
                Err(format!("Failed to parse config file: {}", e))
            }
        },
        Err(e) => {
            warn!("Failed to read config file: {}", e);
            Err(format!("Failed to read config file: {}", e))
        }
    }
}

/// Loads configuration overrides from environment variables
///
/// Reads `SATCHEL_DATABASE_URL` and `SATCHEL_BUSY_TIMEOUT_MS`; a timeout
/// that does not parse as an integer is ignored with a warning.
pub fn config_from_env() -> ConfigUpdate {
    let busy_timeout_ms = env::var("SATCHEL_BUSY_TIMEOUT_MS")
        .ok()
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(ms) => Some(ms),
            Err(_) => {
                warn!("Ignoring unparseable SATCHEL_BUSY_TIMEOUT_MS: {:?}", raw);
                None
            }
        });

    ConfigUpdate {
        database_url: env::var("SATCHEL_DATABASE_URL").ok(),
        busy_timeout_ms,
    }
}

/// Gets the complete configuration by combining defaults with
/// values from the config file and environment variables
/// in order of increasing precedence
pub fn get_config() -> Config {
    dotenv::dotenv().ok();

    let project_dirs = ProjectDirs::from("org", "studivance", "satchel");
    if project_dirs.is_none() {
        warn!("Could not determine platform directories, using the working directory");
    }

    // The database lives under the platform data directory when one exists
    let data_path = project_dirs.as_ref().and_then(|dirs| {
        let data_dir = dirs.data_dir();
        match fs::create_dir_all(data_dir) {
            Ok(()) => Some(data_dir.to_path_buf()),
            Err(e) => {
                warn!("Could not create data directory {:?}: {}", data_dir, e);
                None
            }
        }
    });

    let config_path = project_dirs
        .as_ref()
        .map(|dirs| dirs.config_dir().join("config.toml"));

    let base = base_config(data_path);

    // Apply updates in order of increasing precedence
    let config = base
        .apply_update(config_from_file(config_path).unwrap_or_default())
        .apply_update(config_from_env());

    info!(
        "Final configuration: database_url={}, busy_timeout={}ms",
        config.database_url, config.busy_timeout_ms
    );

    config
}
