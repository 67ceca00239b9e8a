//! Anchor decoding.
//!
//! Turns the attribute-major tensor into one record per column. Decoding does
//! no filtering; anchor `i` always comes from column `i`.

use crate::geometry::BBox;
use crate::tensor::{Attribute, RawTensor};

#[cfg(feature = "rayon")]
pub mod rayon;

/// One raw candidate emitted by the detector, in model-normalized space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    /// Column of the tensor this anchor was read from.
    pub index: usize,
    pub center_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
}

impl Anchor {
    /// Corner-form box of this anchor.
    pub fn to_bbox(&self) -> BBox {
        BBox::from_center(self.center_x, self.center_y, self.width, self.height)
    }
}

/// Reads anchor `index`; the caller guarantees `index < tensor.num_anchors()`.
#[inline]
pub(crate) fn anchor_at(tensor: RawTensor<'_>, index: usize) -> Anchor {
    Anchor {
        index,
        center_x: tensor.row(Attribute::CenterX)[index],
        center_y: tensor.row(Attribute::CenterY)[index],
        width: tensor.row(Attribute::Width)[index],
        height: tensor.row(Attribute::Height)[index],
        confidence: tensor.row(Attribute::Confidence)[index],
    }
}

/// Decodes every column of `tensor` into an [`Anchor`].
pub fn decode(tensor: RawTensor<'_>) -> Vec<Anchor> {
    (0..tensor.num_anchors())
        .map(|index| anchor_at(tensor, index))
        .collect()
}
