//! detpost turns raw single-class detector output into scored boxes.
//!
//! The input is a 5 x N attribute-major tensor (center x, center y, width,
//! height, confidence per anchor). [`Postprocessor`] decodes it, keeps anchors
//! above a confidence threshold, converts them to corner form and runs greedy
//! IoU non-maximum suppression. Everything is pure and synchronous; the
//! optional `rayon` feature parallelises decoding and filtering, and the
//! optional `tracing` feature emits spans for each pass.

mod trace;

mod candidate;
pub mod decode;
pub mod geometry;
pub mod lowlevel;
pub mod model;
pub mod pipeline;
pub mod tensor;
pub mod util;

pub use candidate::Detection;
pub use decode::Anchor;
pub use geometry::{BBox, Rescale};
pub use model::Model;
pub use pipeline::{postprocess, DetectionSet, PostprocessConfig, Postprocessor};
pub use tensor::{Attribute, OwnedTensor, RawTensor, ATTRIBUTE_ROWS};
pub use util::{DetPostError, DetPostResult, ErrorKind};

pub use candidate::nms::{nms_indices, non_max_suppression};
