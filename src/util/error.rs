//! Error types for detpost.

use thiserror::Error;

/// Result alias for detpost operations.
pub type DetPostResult<T> = std::result::Result<T, DetPostError>;

/// Coarse classification of [`DetPostError`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The detection tensor does not have the geometry the decoder expects.
    Shape,
    /// A threshold, cap or rescale parameter is out of range.
    Config,
    /// The injected model handle failed to produce a tensor.
    Inference,
}

/// Errors that can occur when post-processing detector output.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DetPostError {
    /// The tensor has the wrong number of attribute rows.
    #[error("invalid tensor rows: expected {expected}, got {rows}")]
    InvalidRows { rows: usize, expected: usize },
    /// The tensor declares zero anchors.
    #[error("tensor has no anchors")]
    NoAnchors,
    /// The backing buffer length disagrees with the declared shape.
    #[error("tensor buffer length mismatch: {rows}x{cols} needs {needed}, got {len}")]
    LengthMismatch {
        rows: usize,
        cols: usize,
        needed: usize,
        len: usize,
    },
    /// The tensor shape has an unsupported rank or batch size.
    #[error("unsupported tensor shape {shape:?}: {reason}")]
    UnsupportedShape {
        shape: Vec<usize>,
        reason: &'static str,
    },
    /// Box and score slices passed to NMS differ in length.
    #[error("got {boxes} boxes but {scores} scores")]
    ScoreCountMismatch { boxes: usize, scores: usize },
    /// A threshold lies outside `[0, 1]` or is NaN.
    #[error("{name} must be within [0, 1], got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },
    /// The output cap is zero.
    #[error("max_output_size must be at least 1")]
    ZeroMaxOutput,
    /// A rescale dimension is not a positive finite number.
    #[error("rescale {name} must be positive and finite, got {value}")]
    InvalidScale { name: &'static str, value: f32 },
    /// The model handle reported a failure.
    #[error("inference failed: {reason}")]
    Inference { reason: String },
}

impl DetPostError {
    /// Returns the coarse kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DetPostError::InvalidRows { .. }
            | DetPostError::NoAnchors
            | DetPostError::LengthMismatch { .. }
            | DetPostError::UnsupportedShape { .. }
            | DetPostError::ScoreCountMismatch { .. } => ErrorKind::Shape,
            DetPostError::ThresholdOutOfRange { .. }
            | DetPostError::ZeroMaxOutput
            | DetPostError::InvalidScale { .. } => ErrorKind::Config,
            DetPostError::Inference { .. } => ErrorKind::Inference,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DetPostError, ErrorKind};

    #[test]
    fn kinds_split_shape_from_config() {
        let shape = DetPostError::InvalidRows {
            rows: 4,
            expected: 5,
        };
        assert_eq!(shape.kind(), ErrorKind::Shape);
        assert_eq!(DetPostError::ZeroMaxOutput.kind(), ErrorKind::Config);
        let inference = DetPostError::Inference {
            reason: "device lost".to_string(),
        };
        assert_eq!(inference.kind(), ErrorKind::Inference);
    }

    #[test]
    fn messages_name_the_offending_value() {
        let err = DetPostError::ThresholdOutOfRange {
            name: "iou_threshold",
            value: 1.5,
        };
        assert_eq!(err.to_string(), "iou_threshold must be within [0, 1], got 1.5");
    }
}
