//! Server configuration management.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::path::PathBuf;
use std::sync::OnceLock;

/// Global configuration instance.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Base URL that track urls are rooted at.
    pub asset_base_url: String,
    /// Optional directory served under `/assets`.
    pub assets_folder: Option<PathBuf>,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json or pretty).
    pub log_format: LogFormat,
    /// Allowed CORS origins (comma-separated, or * for all).
    pub cors_origins: Vec<String>,
}

/// Log output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable colored output.
    Pretty,
    /// JSON structured logging for production.
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 5000,
        };

        let asset_base_url =
            lookup("ASSET_BASE_URL").unwrap_or_else(|| "http://localhost:5173".to_string());

        let assets_folder = lookup("ASSETS_FOLDER")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match lookup("LOG_FORMAT")
            .unwrap_or_else(|| "pretty".to_string())
            .to_lowercase()
            .as_str()
        {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let cors_origins = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port,
            asset_base_url,
            assets_folder,
            log_level,
            log_format,
            cors_origins,
        })
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns an error if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.asset_base_url.starts_with("http://")
            || self.asset_base_url.starts_with("https://"))
        {
            return Err(ConfigError::InvalidAssetBaseUrl(self.asset_base_url.clone()));
        }

        if let Some(folder) = &self.assets_folder {
            if !folder.is_dir() {
                return Err(ConfigError::AssetsFolderNotFound(
                    folder.display().to_string(),
                ));
            }
        }

        if self.cors_origins.is_empty() {
            tracing::warn!("CORS_ORIGINS is empty, cross-origin requests will be rejected");
        }

        Ok(())
    }

    /// Get the server bind address.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid port number, got '{0}'")]
    InvalidPort(String),

    #[error("ASSET_BASE_URL must be an absolute http(s) URL, got '{0}'")]
    InvalidAssetBaseUrl(String),

    #[error("Assets folder not found or not a directory: {0}")]
    AssetsFolderNotFound(String),
}

/// Initialize the global configuration.
///
/// Should be called once at application startup.
pub fn init() -> Result<&'static Config, ConfigError> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}
