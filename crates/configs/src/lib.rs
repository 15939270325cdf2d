//! # configs
//!
//! Layered runtime settings: an optional `config.*` file overridden by
//! `RA__`-prefixed environment variables (`RA__AUTH__JWT_SECRET`, ...).
//! The JWT secret never leaves its `SecretString` wrapper here.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub http: HttpSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    /// The SPA origin allowed by CORS; unset means any origin.
    #[serde(default)]
    pub cors_origin: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_origin: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: SecretString,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Fallback tracing filter when RUST_LOG is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:5000".to_string()
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Settings {
    /// Loads `config.*` (if present) and then the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("RA").separator("__"))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }
}
