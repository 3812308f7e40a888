//! Client configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use private_okey::EngineConfig;
use std::time::Duration;

/// Default server endpoint when neither the CLI nor the environment names one.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8080/ws";

/// Complete client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server
    pub server_url: String,
    /// Identity announced in `HELLO` and used to find the local seat
    pub user_id: String,
    /// Room to join right after connecting, if any
    pub room_id: Option<String>,
    /// Period of the table tick loop in milliseconds
    pub tick_ms: u64,
    /// Settings handed to the reconciler
    pub engine: EngineConfig,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `server_override` - Optional server URL override (from CLI args)
    /// * `user_override` - Optional user id override (from CLI args)
    /// * `room_override` - Optional room id override (from CLI args)
    ///
    /// # Errors
    ///
    /// Returns error if no user id can be determined
    pub fn from_env(
        server_override: Option<String>,
        user_override: Option<String>,
        room_override: Option<String>,
    ) -> Result<Self, ConfigError> {
        let server_url = server_override
            .or_else(|| std::env::var("OKEY_SERVER_URL").ok())
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string());

        // Fall back to the login name, like a local dev session would.
        let user_id = user_override
            .or_else(|| std::env::var("OKEY_USER_ID").ok())
            .unwrap_or_else(whoami::username);
        if user_id.trim().is_empty() {
            return Err(ConfigError::MissingRequired {
                var: "OKEY_USER_ID".to_string(),
                hint: "Pass --user NAME or export OKEY_USER_ID".to_string(),
            });
        }

        let room_id = room_override
            .or_else(|| std::env::var("OKEY_ROOM_ID").ok())
            .filter(|room| !room.trim().is_empty());

        let engine = EngineConfig {
            deal_fly_seconds: parse_env_or(
                "OKEY_DEAL_FLY_SECONDS",
                EngineConfig::default().deal_fly_seconds,
            ),
            ..EngineConfig::default()
        };

        Ok(ClientConfig {
            server_url,
            user_id,
            room_id,
            tick_ms: parse_env_or("OKEY_TICK_MS", 16),
            engine,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.server_url.starts_with("ws://") || self.server_url.starts_with("wss://")) {
            return Err(ConfigError::Invalid {
                var: "OKEY_SERVER_URL".to_string(),
                reason: format!("Must be a ws:// or wss:// URL, got '{}'", self.server_url),
            });
        }

        if self.tick_ms == 0 || self.tick_ms > 1000 {
            return Err(ConfigError::Invalid {
                var: "OKEY_TICK_MS".to_string(),
                reason: "Must be between 1 and 1000".to_string(),
            });
        }

        self.engine.validate()?;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },

    #[error(transparent)]
    Engine(#[from] private_okey::ConfigError),
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
