//! Configuration-time error types

use thiserror::Error;

/// Errors raised while assembling a run, before the engine starts.
///
/// Every variant is fatal: the binary prints it and exits non-zero.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result alias using common Error
pub type Result<T> = std::result::Result<T, Error>;
