//! Common error types for lexicast

use thiserror::Error;

/// Common result type for lexicast operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared across lexicast crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file parse error (wraps toml::de::Error)
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
