//! Error types for lexicast-player
//!
//! Defines module-specific error types using thiserror for clear error
//! propagation.

use thiserror::Error;

use crate::source::SourceError;

/// Main error type for the lexicast-player module
#[derive(Error, Debug)]
pub enum Error {
    /// The controller task has shut down and no longer accepts input
    #[error("player controller is closed")]
    ControllerClosed,

    /// Episode resolution errors
    #[error("episode source error: {0}")]
    Source(#[from] SourceError),
}

/// Convenience Result type using lexicast-player Error
pub type Result<T> = std::result::Result<T, Error>;
