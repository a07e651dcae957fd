//! Configuration for the grocery list service
//!
//! Settings come from a TOML file (or JSON string) and can be overridden
//! from the environment. Every section has working defaults, so an empty
//! file is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable naming a config file
pub const CONFIG_ENV: &str = "GROCERY_CONFIG";
/// Environment override for the listen address
pub const ADDR_ENV: &str = "GROCERY_ADDR";
/// Environment override for the SQLite database path
pub const DB_ENV: &str = "GROCERY_DB";
/// Environment override for the storage backend
pub const BACKEND_ENV: &str = "GROCERY_BACKEND";

const APP_DIR: &str = "grocery-list";

/// Service-wide configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroceryConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub events: EventConfig,
}

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind
    pub addr: String,
    /// Allow cross-origin requests from any origin
    pub permissive_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1:3000".to_string(),
            permissive_cors: true,
        }
    }
}

/// Which store implementation backs the list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl std::str::FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(ConfigError::InvalidValue(format!(
                "unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Database file; defaults to the platform data directory
    pub path: Option<PathBuf>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: None,
        }
    }
}

impl StorageConfig {
    /// Database path, falling back to `<data_dir>/grocery-list/grocery.db`
    pub fn resolved_path(&self) -> PathBuf {
        match &self.path {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR)
                .join("grocery.db"),
        }
    }
}

/// Event publishing settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Log item events; when false they are dropped
    pub log: bool,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { log: true }
    }
}

impl GroceryConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read a config file; `.json` files are parsed as JSON, anything else as TOML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;

        if path.extension().and_then(|e| e.to_str()) == Some("json") {
            Self::from_json(&content)
        } else {
            Self::from_toml(&content)
        }
    }

    /// Default config file location: `<config_dir>/grocery-list/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load from the standard locations and apply environment overrides.
    ///
    /// A file named by `GROCERY_CONFIG` must exist; the default location is
    /// used only when present.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(path)?,
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `GROCERY_*` overrides from a variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup(ADDR_ENV) {
            self.server.addr = addr;
        }
        if let Some(backend) = lookup(BACKEND_ENV) {
            self.storage.backend = backend.parse()?;
        }
        if let Some(path) = lookup(DB_ENV) {
            self.storage.path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.addr.trim().is_empty() {
            return Err(ConfigError::MissingField("server.addr".to_string()));
        }

        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "storage.path must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(String),
    /// Config text is not valid TOML/JSON for this schema
    #[error("Parse error: {0}")]
    Parse(String),
    /// A value is not acceptable
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// Required field is missing
    #[error("Missing field: {0}")]
    MissingField(String),
}
