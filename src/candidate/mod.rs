//! Candidate selection and pruning.
//!
//! The filter turns decoded anchors into scored boxes; greedy NMS prunes
//! overlapping boxes in descending score order.

use std::cmp::Ordering;

use crate::geometry::BBox;

pub(crate) mod filter;
pub(crate) mod nms;

/// A scored corner-form box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    /// Box corners, model-normalized unless a rescale was configured.
    pub bbox: BBox,
    /// Confidence carried over from the anchor.
    pub score: f32,
    /// Tensor column the detection came from.
    pub anchor: usize,
}

/// NaN ranks below every real score.
fn rank(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}

pub(crate) fn detection_cmp_desc(a: &Detection, b: &Detection) -> Ordering {
    rank(b.score)
        .total_cmp(&rank(a.score))
        .then_with(|| a.anchor.cmp(&b.anchor))
}

/// Sorts detections by descending score; ties go to the lower anchor index.
pub(crate) fn sort_detections_desc(detections: &mut [Detection]) {
    detections.sort_by(detection_cmp_desc);
}

#[cfg(test)]
mod tests {
    use super::{sort_detections_desc, Detection};
    use crate::geometry::BBox;

    fn det(anchor: usize, score: f32) -> Detection {
        Detection {
            bbox: BBox::new(0.0, 0.0, 1.0, 1.0),
            score,
            anchor,
        }
    }

    #[test]
    fn ties_prefer_lower_anchor() {
        let mut dets = vec![det(3, 0.5), det(1, 0.9), det(0, 0.5), det(2, f32::NAN)];
        sort_detections_desc(&mut dets);
        let order: Vec<usize> = dets.iter().map(|d| d.anchor).collect();
        assert_eq!(order, vec![1, 0, 3, 2]);
    }
}
