//! Client configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::store::DEFAULT_GENERATE_DELAY;

/// Settings for the command-line client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the catalog service.
    pub api_url: String,
    /// File holding liked and recent tracks.
    pub state_file: PathBuf,
    /// Pause before a generate request is sent.
    pub generate_delay: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url =
            lookup("QUICKTUNE_API_URL").unwrap_or_else(|| "http://localhost:5000".to_string());

        let state_file = PathBuf::from(
            lookup("QUICKTUNE_STATE_FILE").unwrap_or_else(|| "./data/state.json".to_string()),
        );

        let generate_delay = match lookup("QUICKTUNE_GENERATE_DELAY_MS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(ms) => Duration::from_millis(ms),
                Err(_) => {
                    tracing::warn!(value = %raw, "Invalid QUICKTUNE_GENERATE_DELAY_MS, using default");
                    DEFAULT_GENERATE_DELAY
                }
            },
            None => DEFAULT_GENERATE_DELAY,
        };

        Self {
            api_url,
            state_file,
            generate_delay,
        }
    }
}
