//! Error types for weather type classification.

use thiserror::Error;

/// Result type alias using LwtError.
pub type Result<T> = std::result::Result<T, LwtError>;

/// Primary error type for classification operations.
#[derive(Debug, Error)]
pub enum LwtError {
    // === Coordinate Errors ===
    #[error("Malformed axis '{axis}': {message}")]
    MalformedAxis { axis: String, message: String },

    #[error("Axis '{expected}' not found (field has '{found}')")]
    AxisNotFound { expected: String, found: String },

    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("Center selection is empty: {0}")]
    EmptySelection(String),

    // === Configuration Errors ===
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl LwtError {
    /// Create a MalformedAxis error.
    pub fn malformed_axis(axis: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedAxis {
            axis: axis.into(),
            message: message.into(),
        }
    }

    /// Create an AxisNotFound error.
    pub fn axis_not_found(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::AxisNotFound {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(msg: impl Into<String>) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Whether the error was raised while validating inputs, before any
    /// numeric work started.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            LwtError::MalformedAxis { .. }
                | LwtError::AxisNotFound { .. }
                | LwtError::InvalidConfig(_)
                | LwtError::EmptySelection(_)
        )
    }
}

impl From<serde_json::Error> for LwtError {
    fn from(err: serde_json::Error) -> Self {
        LwtError::InvalidConfig(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for LwtError {
    fn from(err: serde_yaml::Error) -> Self {
        LwtError::InvalidConfig(format!("YAML error: {}", err))
    }
}

impl From<ndarray::ShapeError> for LwtError {
    fn from(err: ndarray::ShapeError) -> Self {
        LwtError::ShapeMismatch(err.to_string())
    }
}
