//! Episode source seam
//!
//! Resolves an episode identifier to the URL of its audio track. Resolution
//! is the caller's async work (catalog lookup, HTTP fetch); the player only
//! consumes the resulting URL, so the trait stays small.

use std::future::Future;

use thiserror::Error;

use lexicast_common::AudioUrl;

/// Errors from resolving an episode to its audio URL
#[derive(Error, Debug)]
pub enum SourceError {
    /// No episode with this identifier
    #[error("episode not found: {episode_id}")]
    NotFound { episode_id: String },

    /// Lookup reached the catalog but failed
    #[error("episode lookup failed: {0}")]
    Network(String),
}

/// Anything that can turn an episode identifier into an audio URL.
///
/// Implementations may simply write `async fn fetch_audio_url(..)`.
pub trait EpisodeSource: Send + Sync {
    fn fetch_audio_url(
        &self,
        episode_id: &str,
    ) -> impl Future<Output = Result<AudioUrl, SourceError>> + Send;
}
