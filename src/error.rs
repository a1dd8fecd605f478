use std::fmt;

use ndarray::Array2;

/// Result type for gradnet operations
pub type Result<T> = std::result::Result<T, GradnetError>;

/// Main error type for the gradnet library
#[derive(Debug, Clone, PartialEq)]
pub enum GradnetError {
    /// Incompatible matrix dimensions between layers, loss inputs, or
    /// optimizer state and its parameter
    ShapeMismatch {
        context: String,
        expected: String,
        actual: String,
    },

    /// Backward or update called without the required prior pass on the
    /// named layer
    UnpairedBackward {
        layer: String,
    },

    /// NaN or infinity produced by an optimizer update, a decaying
    /// accumulator, or a layer output
    NonFinite {
        context: String,
    },

    /// A restored network's layer count, shapes, or types disagree with the
    /// persisted record; the load is abandoned as a whole
    SerializationMismatch {
        reason: String,
    },

    /// Serialization/deserialization errors
    SerializationError(String),

    /// IO errors (file operations)
    IoError(String),

    /// Invalid parameter value
    InvalidParameter {
        name: String,
        reason: String,
    },
}

impl fmt::Display for GradnetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradnetError::ShapeMismatch { context, expected, actual } => {
                write!(f, "Shape mismatch in {}: expected {}, got {}", context, expected, actual)
            }
            GradnetError::UnpairedBackward { layer } => {
                write!(f, "Layer '{}' has no cached pass to pair with this call", layer)
            }
            GradnetError::NonFinite { context } => {
                write!(f, "Non-finite value produced in {}", context)
            }
            GradnetError::SerializationMismatch { reason } => {
                write!(f, "Restored network is inconsistent: {}", reason)
            }
            GradnetError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            GradnetError::IoError(msg) => write!(f, "IO error: {}", msg),
            GradnetError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for GradnetError {}

// Conversion from std::io::Error
impl From<std::io::Error> for GradnetError {
    fn from(err: std::io::Error) -> Self {
        GradnetError::IoError(err.to_string())
    }
}

// Conversion from bincode::Error
impl From<bincode::Error> for GradnetError {
    fn from(err: bincode::Error) -> Self {
        GradnetError::SerializationError(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for GradnetError {
    fn from(err: serde_json::Error) -> Self {
        GradnetError::SerializationError(err.to_string())
    }
}

// Helper functions for common error patterns
impl GradnetError {
    pub fn shape_mismatch<E: fmt::Debug, A: fmt::Debug>(
        context: impl Into<String>,
        expected: E,
        actual: A,
    ) -> Self {
        GradnetError::ShapeMismatch {
            context: context.into(),
            expected: format!("{:?}", expected),
            actual: format!("{:?}", actual),
        }
    }

    pub fn unpaired_backward(layer: impl Into<String>) -> Self {
        GradnetError::UnpairedBackward { layer: layer.into() }
    }

    pub fn non_finite(context: impl Into<String>) -> Self {
        GradnetError::NonFinite { context: context.into() }
    }
}

/// Fail-fast check that a matrix contains only finite values.
pub(crate) fn ensure_finite(values: &Array2<f32>, context: &str) -> Result<()> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(GradnetError::non_finite(context))
    }
}
