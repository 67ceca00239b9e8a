//! Inference seam.
//!
//! The detector itself is a black box: anything that turns an input into an
//! [`OwnedTensor`] through a shared reference can be plugged into
//! [`crate::Postprocessor::detect`]. The handle is borrowed immutably per call,
//! so a loaded model can be shared across request threads without a global.

use crate::tensor::OwnedTensor;

/// A loaded, read-only detector.
pub trait Model {
    /// Preprocessed model input (e.g. an NCHW image buffer).
    type Input: ?Sized;
    /// Failure reported by the inference backend.
    type Error: std::error::Error;

    /// Runs one inference pass and returns the raw 5 x N detection tensor.
    fn infer(&self, input: &Self::Input) -> Result<OwnedTensor, Self::Error>;
}
