//! Rayon-parallel decoding (feature-gated).
//!
//! Splits the anchor columns across the rayon pool. Output is identical to
//! the sequential path, including order.

use crate::decode::{anchor_at, Anchor};
use crate::tensor::RawTensor;
use rayon::prelude::*;

/// Parallel counterpart of [`crate::decode::decode`].
pub fn decode_par(tensor: RawTensor<'_>) -> Vec<Anchor> {
    (0..tensor.num_anchors())
        .into_par_iter()
        .map(|index| anchor_at(tensor, index))
        .collect()
}
