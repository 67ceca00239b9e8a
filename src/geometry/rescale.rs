//! Model-space to image-space rescaling.

use crate::geometry::BBox;
use crate::util::{DetPostError, DetPostResult};

/// Per-axis scale from the model input size to the original image size.
///
/// Boxes are multiplied by `original / model` on each axis. The reference
/// backend carried this transform disabled, and it is not known whether the
/// caller was meant to rescale separately, so the pipeline only applies it
/// when one is configured.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rescale {
    pub model_width: f32,
    pub model_height: f32,
    pub original_width: f32,
    pub original_height: f32,
}

impl Rescale {
    /// Square model input of `model_size` mapped onto an `original_width x original_height` image.
    pub fn from_square_model(model_size: f32, original_width: f32, original_height: f32) -> Self {
        Self {
            model_width: model_size,
            model_height: model_size,
            original_width,
            original_height,
        }
    }

    /// Checks that every dimension is positive and finite.
    pub fn validate(&self) -> DetPostResult<()> {
        let dims = [
            ("model_width", self.model_width),
            ("model_height", self.model_height),
            ("original_width", self.original_width),
            ("original_height", self.original_height),
        ];
        for (name, value) in dims {
            if !(value.is_finite() && value > 0.0) {
                return Err(DetPostError::InvalidScale { name, value });
            }
        }
        Ok(())
    }

    /// Returns `(sx, sy)`.
    pub fn factors(&self) -> (f32, f32) {
        (
            self.original_width / self.model_width,
            self.original_height / self.model_height,
        )
    }

    /// Applies the scale to a box.
    pub fn apply(&self, bbox: &BBox) -> BBox {
        let (sx, sy) = self.factors();
        bbox.scaled(sx, sy)
    }
}

#[cfg(test)]
mod tests {
    use super::Rescale;
    use crate::geometry::BBox;
    use crate::util::DetPostError;

    #[test]
    fn scales_each_axis_independently() {
        let rescale = Rescale::from_square_model(640.0, 1280.0, 320.0);
        let out = rescale.apply(&BBox::new(10.0, 10.0, 20.0, 40.0));
        assert_eq!(out.to_array(), [20.0, 5.0, 40.0, 20.0]);
    }

    #[test]
    fn rejects_non_positive_sizes() {
        let rescale = Rescale::from_square_model(0.0, 100.0, 100.0);
        assert_eq!(
            rescale.validate(),
            Err(DetPostError::InvalidScale {
                name: "model_width",
                value: 0.0,
            })
        );
        let rescale = Rescale::from_square_model(640.0, f32::NAN, 100.0);
        assert!(rescale.validate().is_err());
    }
}
