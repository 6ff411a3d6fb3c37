//! Error types for building and driving animations

use frameplot_canvas_core::CanvasError;
use serde::{Deserialize, Serialize};

/// Every failure is a programming or input error surfaced at construction,
/// append or export time; nothing here is retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum AnimationError {
    /// Paired arrays disagree on a dimension
    #[error("shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        what: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// Frame counts disagree (blocks vs timeline, title fields, ragged pairs)
    #[error("length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: String,
        expected: usize,
        actual: usize,
    },

    /// Input that cannot be interpreted at all
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Input of the wrong kind or dimensionality
    #[error("type mismatch: {reason}")]
    TypeMismatch { reason: String },

    /// A combination the blocks deliberately do not implement
    #[error("not supported: {feature}")]
    Unsupported { feature: String },

    /// Frame index outside [0, len)
    #[error("frame index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Drawing target rejected an operation
    #[error("canvas error: {0}")]
    Canvas(#[from] CanvasError),

    /// A user callback (Update/Nuke) failed
    #[error("callback error: {reason}")]
    Callback { reason: String },

    /// Frame writer failure
    #[error("export error: {reason}")]
    Export { reason: String },

    /// IO error
    #[error("IO error: {reason}")]
    Io { reason: String },
}

impl AnimationError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn type_mismatch(reason: impl Into<String>) -> Self {
        Self::TypeMismatch {
            reason: reason.into(),
        }
    }

    pub fn unsupported(feature: impl Into<String>) -> Self {
        Self::Unsupported {
            feature: feature.into(),
        }
    }

    pub fn shape(what: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }

    pub fn length(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::LengthMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::ShapeMismatch { .. }
            | Self::LengthMismatch { .. }
            | Self::InvalidInput { .. } => "validation",
            Self::TypeMismatch { .. } => "type",
            Self::Unsupported { .. } => "unsupported",
            Self::IndexOutOfRange { .. } => "index",
            Self::Canvas(_) => "canvas",
            Self::Callback { .. } => "callback",
            Self::Export { .. } => "export",
            Self::Io { .. } => "io",
        }
    }
}

impl From<std::io::Error> for AnimationError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for AnimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Export {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(AnimationError::length("block", 5, 6).category(), "validation");
        assert_eq!(AnimationError::type_mismatch("x").category(), "type");
        assert_eq!(
            AnimationError::IndexOutOfRange { index: 3, len: 2 }.category(),
            "index"
        );
        let canvas: AnimationError = CanvasError::Backend("boom".into()).into();
        assert_eq!(canvas.category(), "canvas");
    }

    #[test]
    fn test_shape_message_names_both_shapes() {
        let err = AnimationError::shape("x", &[5, 20], &[5, 19]);
        assert_eq!(
            err.to_string(),
            "shape mismatch for x: expected [5, 20], got [5, 19]"
        );
    }

    #[test]
    fn test_serialization() {
        let error = AnimationError::invalid("test");
        let serialized = serde_json::to_string(&error).unwrap();
        let deserialized: AnimationError = serde_json::from_str(&serialized).unwrap();
        assert_eq!(error, deserialized);
    }
}
