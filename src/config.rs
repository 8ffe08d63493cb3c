//! Layered server configuration.
//!
//! Values are read, in increasing precedence, from built-in defaults, an
//! optional TOML file (`taskchat.toml`, or the path in `TASKCHAT_CONFIG`)
//! and `TASKCHAT__`-prefixed environment variables using `__` as the
//! section separator, e.g. `TASKCHAT__AUTH__JWT_SECRET`.

use std::net::SocketAddr;
use std::time::Duration;

use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use thiserror::Error;

use crate::conversation::adapters::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiSettings};

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "TASKCHAT_CONFIG";

/// Configuration file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_FILE: &str = "taskchat.toml";

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "TASKCHAT";

/// Fallback environment variable for the agent API key.
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A source could not be read or deserialised.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// `auth.jwt_secret` is missing or blank.
    #[error("auth.jwt_secret must be set")]
    MissingJwtSecret,
}

/// Complete server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerSettings,
    /// Bearer-token settings.
    #[serde(default)]
    pub auth: AuthSettings,
    /// Language-model agent settings.
    #[serde(default)]
    pub agent: AgentSettings,
    /// Persistence settings.
    #[serde(default)]
    pub storage: StorageSettings,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// HTTP listener settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// Address the server binds to.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 8000))
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

/// Bearer-token settings.
#[derive(Clone, Default, Deserialize)]
pub struct AuthSettings {
    /// HS256 secret shared with the token issuer.
    #[serde(default)]
    pub jwt_secret: String,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"[REDACTED]")
            .finish()
    }
}

/// Language-model agent settings.
#[derive(Clone, Deserialize)]
pub struct AgentSettings {
    /// Gemini API key; falls back to `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

const fn default_timeout_secs() -> u64 {
    60
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl std::fmt::Debug for AgentSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AgentSettings {
    /// Converts these settings into the Gemini adapter's settings.
    #[must_use]
    pub fn to_gemini_settings(&self) -> GeminiSettings {
        GeminiSettings {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// `PostgreSQL` URL; in-memory stores are used when unset.
    #[serde(default)]
    pub database_url: Option<String>,
    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

const fn default_pool_size() -> u32 {
    8
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_size: default_pool_size(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `taskchat=debug`.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_owned()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the file and environment sources.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source is malformed or the JWT
    /// secret is missing.
    pub fn load() -> Result<Self, SettingsError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_owned());
        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(builder, std::env::var(GEMINI_API_KEY_ENV).ok())
    }

    /// Builds configuration from prepared sources.
    ///
    /// `fallback_api_key` is used when no agent key is configured.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when a source is malformed or the JWT
    /// secret is missing.
    pub fn from_builder(
        builder: ConfigBuilder<DefaultState>,
        fallback_api_key: Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut loaded: Self = builder.build()?.try_deserialize()?;

        if loaded.auth.jwt_secret.trim().is_empty() {
            return Err(SettingsError::MissingJwtSecret);
        }
        if loaded.agent.api_key.is_none() {
            loaded.agent.api_key = fallback_api_key.filter(|key| !key.trim().is_empty());
        }
        Ok(loaded)
    }
}
