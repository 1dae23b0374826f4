//! Error types for the tools.

use std::path::PathBuf;

use opwar_core::error::GameError;
use thiserror::Error;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Everything that can stop a tool run.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A data file could not be read.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Content failed to parse or a unit failed to build.
    #[error(transparent)]
    Game(#[from] GameError),

    /// Output encoding failed.
    #[error("Failed to encode output: {0}")]
    Encode(String),
}
