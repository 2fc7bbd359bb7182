//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, NnError>;

/// (rows, cols)
pub type Shape = (usize, usize);

#[derive(Error, Debug)]
pub enum NnError {
    /// Matrix or batch dimensions disagree with the configuration or with each other.
    #[error("shape mismatch in {context}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Shape,
        actual: Shape,
    },

    /// Prediction was requested before any parameters were allocated.
    #[error("network parameters have not been initialized")]
    UninitializedNetwork,

    /// Reduction axis outside {0, 1}.
    #[error("invalid reduction axis {0}; expected 0 (columns) or 1 (rows)")]
    InvalidAxis(usize),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A data row could not be parsed. `line` is 1-based.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: unknown class '{name}'")]
    UnknownClass { line: usize, name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NnError {
    pub(crate) fn shape(context: &'static str, expected: Shape, actual: Shape) -> NnError {
        NnError::ShapeMismatch { context, expected, actual }
    }
}
