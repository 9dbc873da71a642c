//! Configuration types and loading
//!
//! Config precedence: `--config` flag > `MSOLSPRAY_CONFIG` env var > built-in
//! defaults. Every key is optional, so an empty file is a valid config.
//! Credentials never live here: users and the password come from the CLI.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use spray_pool::DEFAULT_LOCKOUT_THRESHOLD;

/// Env var naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "MSOLSPRAY_CONFIG";

/// Root configuration
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub spray: SprayConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Engine and endpoint settings
#[derive(Debug, Deserialize)]
pub struct SprayConfig {
    /// Lockout responses tolerated before the run is halted
    #[serde(default = "default_lockout_threshold")]
    pub lockout_threshold: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
}

impl Default for SprayConfig {
    fn default() -> Self {
        Self {
            lockout_threshold: default_lockout_threshold(),
            request_timeout_secs: default_request_timeout(),
            token_endpoint: default_token_endpoint(),
        }
    }
}

/// Metrics export settings
#[derive(Debug, Default, Deserialize)]
pub struct MetricsConfig {
    /// Prometheus textfile written once the run ends
    #[serde(default)]
    pub textfile: Option<PathBuf>,
}

fn default_lockout_threshold() -> u64 {
    DEFAULT_LOCKOUT_THRESHOLD
}

fn default_request_timeout() -> u64 {
    aad_auth::REQUEST_TIMEOUT_SECS
}

fn default_token_endpoint() -> String {
    aad_auth::TOKEN_ENDPOINT.to_string()
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the resolved config file, or fall back to defaults when none is named.
    pub fn load_or_default(cli_path: Option<&Path>) -> common::Result<Self> {
        match Self::resolve_path(cli_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> common::Result<()> {
        if self.spray.lockout_threshold == 0 {
            return Err(common::Error::Config(
                "lockout_threshold must be greater than 0".into(),
            ));
        }

        if self.spray.request_timeout_secs == 0 {
            return Err(common::Error::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        if !self.spray.token_endpoint.starts_with("http://")
            && !self.spray.token_endpoint.starts_with("https://")
        {
            return Err(common::Error::Config(format!(
                "token_endpoint must start with http:// or https://, got: {}",
                self.spray.token_endpoint
            )));
        }

        Ok(())
    }

    /// Resolve config file path from CLI arg or `MSOLSPRAY_CONFIG` env var.
    pub fn resolve_path(cli_path: Option<&Path>) -> Option<PathBuf> {
        if let Some(p) = cli_path {
            return Some(p.to_path_buf());
        }
        std::env::var_os(CONFIG_ENV).map(PathBuf::from)
    }
}
