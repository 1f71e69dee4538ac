//! Error types for the session layer.
//!
//! Session state transitions never fail. The only fallible part of this
//! crate is getting a [`SessionConfig`](crate::SessionConfig) in the first
//! place.

use std::path::PathBuf;

/// Errors that can occur while building a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The config file couldn't be read.
    #[error("failed to read config {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config isn't valid TOML or is missing a required field.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The config parsed but a field has an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
