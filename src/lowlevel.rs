//! Individual pipeline stages for callers assembling their own pass.
//!
//! Most users should prefer [`crate::Postprocessor`]. These functions skip
//! configuration validation.

pub use crate::candidate::filter::filter_anchors;
#[cfg(feature = "rayon")]
pub use crate::candidate::filter::filter_anchors_par;
pub use crate::candidate::nms::{nms_indices, non_max_suppression};
pub use crate::decode::decode;
#[cfg(feature = "rayon")]
pub use crate::decode::rayon::decode_par;
pub use crate::pipeline::config::{
    DEBRIS_CONFIDENCE_THRESHOLD, DEFAULT_IOU_THRESHOLD, DEFAULT_MAX_OUTPUT_SIZE,
    RELAXED_CONFIDENCE_THRESHOLD,
};
