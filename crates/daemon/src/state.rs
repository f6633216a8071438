use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "igfs";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const DEFAULT_API_PORT: u16 = 5001;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Default log level for the daemon (`RUST_LOG` still wins)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_api_port() -> u16 {
    DEFAULT_API_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn tracing_level(&self) -> Result<tracing::Level, StateError> {
        self.log_level
            .parse()
            .map_err(|_| StateError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the igfs directory (~/.igfs)
    pub igfs_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the igfs directory path (custom or default ~/.igfs)
    pub fn igfs_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new igfs state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let igfs_dir = Self::igfs_dir(custom_path)?;

        if igfs_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        let config = config.unwrap_or_default();
        config.tracing_level()?;

        fs::create_dir_all(&igfs_dir)?;

        let config_path = igfs_dir.join(CONFIG_FILE_NAME);
        let config_toml = toml::to_string_pretty(&config)?;
        fs::write(&config_path, config_toml)?;

        // Create empty database (just touch the file, it will be initialized by the service)
        let db_path = igfs_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            igfs_dir,
            db_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the igfs directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let igfs_dir = Self::igfs_dir(custom_path)?;

        if !igfs_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = igfs_dir.join(DB_FILE_NAME);
        let config_path = igfs_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            igfs_dir,
            db_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("igfs directory not initialized. Run 'igfs init' first")]
    NotInitialized,

    #[error("igfs directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
