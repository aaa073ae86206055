//! Error types for the aura engine.
//!
//! Only input rejection, configuration and output problems surface as
//! errors. Degenerate emotion signals, numeric instability and remote
//! analysis failures are recovered inside the pipeline.

use crate::config::ConfigError;

/// Result type alias for engine operations.
pub type AuraResult<T> = Result<T, AuraError>;

#[derive(Debug, thiserror::Error)]
pub enum AuraError {
    /// The dream text was empty or whitespace only.
    #[error("dream text is empty: describe a dream before analyzing it")]
    EmptyDream,

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bitmap backend failed to draw or encode an image.
    #[error("render backend failed: {0}")]
    Render(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AuraError {
    pub fn render(details: impl std::fmt::Display) -> Self {
        AuraError::Render(details.to_string())
    }
}
