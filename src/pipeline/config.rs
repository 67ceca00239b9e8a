//! Post-processing configuration.

use crate::geometry::Rescale;
use crate::trace::trace_reject;
use crate::util::{DetPostError, DetPostResult};

/// Confidence cut used by the debris detector deployment.
pub const DEBRIS_CONFIDENCE_THRESHOLD: f32 = 0.84;
/// Confidence cut used by the relaxed detector deployment.
pub const RELAXED_CONFIDENCE_THRESHOLD: f32 = 0.7;
/// Default NMS overlap threshold.
pub const DEFAULT_IOU_THRESHOLD: f32 = 0.5;
/// Default cap on returned detections.
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 100;

/// Thresholds and options for one decode-filter-suppress pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostprocessConfig {
    /// Anchors with confidence at or above this value are kept.
    pub confidence_threshold: f32,
    /// Boxes overlapping a kept box with IoU at or above this value are dropped.
    pub iou_threshold: f32,
    /// Maximum number of detections returned.
    pub max_output_size: usize,
    /// Optional model-to-image rescale. `None` leaves boxes in model space.
    pub rescale: Option<Rescale>,
    /// Decode and filter on the rayon pool (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: DEBRIS_CONFIDENCE_THRESHOLD,
            iou_threshold: DEFAULT_IOU_THRESHOLD,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
            rescale: None,
            parallel: false,
        }
    }
}

impl PostprocessConfig {
    /// Settings of the debris detector (confidence 0.84). Same as `default()`.
    pub fn debris() -> Self {
        Self::default()
    }

    /// Settings of the relaxed detector (confidence 0.7).
    pub fn relaxed() -> Self {
        Self {
            confidence_threshold: RELAXED_CONFIDENCE_THRESHOLD,
            ..Self::default()
        }
    }

    /// Returns a copy with the given rescale enabled.
    pub fn with_rescale(self, rescale: Rescale) -> Self {
        Self {
            rescale: Some(rescale),
            ..self
        }
    }

    /// Validates thresholds, the output cap and the rescale sizes.
    pub fn validate(&self) -> DetPostResult<()> {
        check_threshold("confidence_threshold", self.confidence_threshold)?;
        check_nms_params(self.max_output_size, self.iou_threshold)?;
        if let Some(rescale) = &self.rescale {
            if let Err(err) = rescale.validate() {
                trace_reject!(err);
                return Err(err);
            }
        }
        Ok(())
    }
}

pub(crate) fn check_threshold(name: &'static str, value: f32) -> DetPostResult<()> {
    if (0.0..=1.0).contains(&value) {
        return Ok(());
    }
    let err = DetPostError::ThresholdOutOfRange { name, value };
    trace_reject!(err);
    Err(err)
}

pub(crate) fn check_nms_params(max_output_size: usize, iou_threshold: f32) -> DetPostResult<()> {
    check_threshold("iou_threshold", iou_threshold)?;
    if max_output_size == 0 {
        let err = DetPostError::ZeroMaxOutput;
        trace_reject!(err);
        return Err(err);
    }
    Ok(())
}
