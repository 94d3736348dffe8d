//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::spapi::marketplace::Marketplace;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Marketplace queries are issued against
    #[serde(default)]
    pub marketplace: Marketplace,

    /// Address the facade binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port the facade listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Upstream request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5002
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marketplace: Marketplace::Us,
            host: default_host(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        // 1. Explicit path takes precedence
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        // 2. Try current directory
        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        // 3. Try XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("amz-gateway").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        // 4. Return default config
        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(marketplace) = std::env::var("AMZ_MARKETPLACE") {
            if let Ok(m) = marketplace.parse() {
                self.marketplace = m;
            }
        }

        if let Ok(port) = std::env::var("AMZ_PORT") {
            if let Ok(p) = port.parse() {
                self.port = p;
            }
        }

        self
    }

    /// The socket address the facade binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Names of the environment variables that must carry SP-API credentials.
pub const REQUIRED_CREDENTIAL_VARS: [&str; 3] =
    ["AMAZON_REFRESH_TOKEN", "AMAZON_LWA_APP_ID", "AMAZON_LWA_CLIENT_SECRET"];

/// SP-API credentials, loaded strictly from the environment.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub refresh_token: String,
    pub lwa_client_id: String,
    pub lwa_client_secret: String,
    pub seller_id: Option<String>,
}

impl Credentials {
    /// Reads credentials from the environment, naming every missing variable.
    pub fn from_env() -> Result<Self> {
        let missing: Vec<&str> = REQUIRED_CREDENTIAL_VARS
            .iter()
            .copied()
            .filter(|var| std::env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true))
            .collect();

        if !missing.is_empty() {
            anyhow::bail!("Missing required environment variables: {}", missing.join(", "));
        }

        Ok(Self {
            refresh_token: std::env::var("AMAZON_REFRESH_TOKEN")?,
            lwa_client_id: std::env::var("AMAZON_LWA_APP_ID")?,
            lwa_client_secret: std::env::var("AMAZON_LWA_CLIENT_SECRET")?,
            seller_id: std::env::var("AMAZON_SELLER_ID").ok().filter(|v| !v.is_empty()),
        })
    }
}
