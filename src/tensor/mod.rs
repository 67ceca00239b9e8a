//! Detection tensor views.
//!
//! `RawTensor` is a borrowed 5 x N view over a flat `f32` buffer laid out
//! attribute-major: row 0 holds every anchor's center x, row 1 center y, then
//! width, height and confidence. Column `i` is anchor `i`. The shape is
//! validated once when the view is built so decoding never has to bounds-check.

use crate::util::{DetPostError, DetPostResult};

/// Number of attribute rows in a single-class detection tensor.
pub const ATTRIBUTE_ROWS: usize = 5;

/// Attribute rows of the detection tensor, in storage order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attribute {
    CenterX,
    CenterY,
    Width,
    Height,
    Confidence,
}

impl Attribute {
    /// All attributes in row order.
    pub const ALL: [Attribute; ATTRIBUTE_ROWS] = [
        Attribute::CenterX,
        Attribute::CenterY,
        Attribute::Width,
        Attribute::Height,
        Attribute::Confidence,
    ];

    /// Returns the row index of this attribute.
    pub fn row(self) -> usize {
        match self {
            Attribute::CenterX => 0,
            Attribute::CenterY => 1,
            Attribute::Width => 2,
            Attribute::Height => 3,
            Attribute::Confidence => 4,
        }
    }
}

/// Borrowed 5 x N detection tensor.
#[derive(Copy, Clone, Debug)]
pub struct RawTensor<'a> {
    data: &'a [f32],
    anchors: usize,
}

impl<'a> RawTensor<'a> {
    /// Creates a view with an explicit `rows x cols` shape.
    ///
    /// `rows` must equal [`ATTRIBUTE_ROWS`] and `data.len()` must equal
    /// `rows * cols`; nothing is truncated or padded.
    pub fn new(data: &'a [f32], rows: usize, cols: usize) -> DetPostResult<Self> {
        check_shape(data.len(), rows, cols)?;
        Ok(Self {
            data,
            anchors: cols,
        })
    }

    /// Creates a view over `anchors` columns of the standard five rows.
    pub fn from_anchors(data: &'a [f32], anchors: usize) -> DetPostResult<Self> {
        Self::new(data, ATTRIBUTE_ROWS, anchors)
    }

    /// Creates a view from a model output shape.
    ///
    /// Accepts `[5, N]` and `[1, 5, N]`; a leading batch dimension of one is
    /// squeezed.
    pub fn from_shape(data: &'a [f32], shape: &[usize]) -> DetPostResult<Self> {
        let (rows, cols) = squeeze_shape(shape)?;
        Self::new(data, rows, cols)
    }

    /// Returns the number of anchors (columns).
    pub fn num_anchors(&self) -> usize {
        self.anchors
    }

    /// Returns the backing buffer.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the full row for `attr`, one value per anchor.
    pub fn row(&self, attr: Attribute) -> &'a [f32] {
        let start = attr.row() * self.anchors;
        &self.data[start..start + self.anchors]
    }

    /// Returns a single attribute of one anchor, if the anchor exists.
    pub fn get(&self, attr: Attribute, anchor: usize) -> Option<f32> {
        if anchor >= self.anchors {
            return None;
        }
        self.row(attr).get(anchor).copied()
    }
}

/// Owned detection tensor, as produced by a model handle.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor {
    data: Vec<f32>,
    anchors: usize,
}

impl OwnedTensor {
    /// Creates an owned tensor with an explicit `rows x cols` shape.
    pub fn new(data: Vec<f32>, rows: usize, cols: usize) -> DetPostResult<Self> {
        check_shape(data.len(), rows, cols)?;
        Ok(Self {
            data,
            anchors: cols,
        })
    }

    /// Creates an owned tensor from a model output shape (`[5, N]` or `[1, 5, N]`).
    pub fn from_shape(data: Vec<f32>, shape: &[usize]) -> DetPostResult<Self> {
        let (rows, cols) = squeeze_shape(shape)?;
        Self::new(data, rows, cols)
    }

    /// Builds a tensor from per-anchor `[cx, cy, w, h, confidence]` records.
    pub fn from_records(records: &[[f32; ATTRIBUTE_ROWS]]) -> DetPostResult<Self> {
        let anchors = records.len();
        let mut data = vec![0.0f32; ATTRIBUTE_ROWS * anchors];
        for (col, record) in records.iter().enumerate() {
            for (row, value) in record.iter().enumerate() {
                data[row * anchors + col] = *value;
            }
        }
        Self::new(data, ATTRIBUTE_ROWS, anchors)
    }

    /// Returns a borrowed view.
    pub fn view(&self) -> RawTensor<'_> {
        RawTensor {
            data: &self.data,
            anchors: self.anchors,
        }
    }

    /// Returns the number of anchors.
    pub fn num_anchors(&self) -> usize {
        self.anchors
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Consumes the tensor and returns its buffer.
    pub fn into_vec(self) -> Vec<f32> {
        self.data
    }
}

fn check_shape(len: usize, rows: usize, cols: usize) -> DetPostResult<()> {
    if rows != ATTRIBUTE_ROWS {
        return Err(DetPostError::InvalidRows {
            rows,
            expected: ATTRIBUTE_ROWS,
        });
    }
    if cols == 0 {
        return Err(DetPostError::NoAnchors);
    }
    let needed = rows
        .checked_mul(cols)
        .ok_or(DetPostError::UnsupportedShape {
            shape: vec![rows, cols],
            reason: "element count overflows usize",
        })?;
    if len != needed {
        return Err(DetPostError::LengthMismatch {
            rows,
            cols,
            needed,
            len,
        });
    }
    Ok(())
}

fn squeeze_shape(shape: &[usize]) -> DetPostResult<(usize, usize)> {
    match *shape {
        [rows, cols] => Ok((rows, cols)),
        [1, rows, cols] => Ok((rows, cols)),
        [_, _, _] => Err(DetPostError::UnsupportedShape {
            shape: shape.to_vec(),
            reason: "batch size must be 1",
        }),
        _ => Err(DetPostError::UnsupportedShape {
            shape: shape.to_vec(),
            reason: "expected rank 2 or 3",
        }),
    }
}
