use crate::error::ExporterError;
use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;

/// Longest refresh interval accepted (one day)
pub const MAX_REFRESH_INTERVAL_SECONDS: u64 = 86_400;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub nature: NatureConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NatureConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_access_token")]
    pub access_token: SecretString,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshConfig {
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
}

fn default_base_url() -> String {
    "https://api.nature.global".to_string()
}

fn default_access_token() -> SecretString {
    SecretString::from("")
}

fn default_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_interval() -> u64 {
    60
}

impl Default for NatureConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: default_access_token(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("NATURE_REMO_EXPORTER").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Reject settings the exporter cannot run with.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.refresh.interval_seconds == 0 {
            return Err(ExporterError::Config(
                "refresh.interval_seconds must be at least 1".to_string(),
            ));
        }
        if self.refresh.interval_seconds > MAX_REFRESH_INTERVAL_SECONDS {
            return Err(ExporterError::Config(format!(
                "refresh.interval_seconds must be at most {}",
                MAX_REFRESH_INTERVAL_SECONDS
            )));
        }
        if self.nature.base_url.trim().is_empty() {
            return Err(ExporterError::Config(
                "nature.base_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
