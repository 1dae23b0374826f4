//! Error types for the unit-state core.

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all unit-state errors.
///
/// Expected business-rule failures (not enough supply, no tokens left) are
/// reported through `bool`/numeric return values instead. These variants
/// cover the faults that reach an operation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// Argument out of range, undefined value, or missing profile at construction.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Operation not supported by the unit's current mode.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A leader or unit identifier failed to resolve.
    #[error("Unresolved reference: {0}")]
    Reference(String),

    /// A bounded collection or stockpile is already at its limit.
    #[error("Capacity exceeded: {0}")]
    Capacity(String),

    /// Data file or persisted record parsing error.
    #[error("Failed to parse data '{source_name}': {message}")]
    Data {
        /// Name of the source that failed to parse.
        source_name: String,
        /// Error message.
        message: String,
    },
}

impl GameError {
    /// Short taxonomy label, used in log fields and notifications.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::InvalidState(_) => "invalid_state",
            Self::Reference(_) => "reference",
            Self::Capacity(_) => "capacity",
            Self::Data { .. } => "data",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GameError::Capacity("airbase full".to_string());
        assert_eq!(err.to_string(), "Capacity exceeded: airbase full");
        assert_eq!(err.kind(), "capacity");
    }

    #[test]
    fn test_data_error_display() {
        let err = GameError::Data {
            source_name: "templates.ron".to_string(),
            message: "unexpected token".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to parse data 'templates.ron': unexpected token"
        );
    }
}
