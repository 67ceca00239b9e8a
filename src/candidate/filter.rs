//! Confidence filtering and corner-form conversion.

use crate::candidate::Detection;
use crate::decode::Anchor;
use crate::geometry::Rescale;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

#[inline]
fn keep(
    anchor: &Anchor,
    confidence_threshold: f32,
    rescale: Option<&Rescale>,
) -> Option<Detection> {
    // NaN confidences fail the comparison and are dropped.
    let passes = anchor.confidence >= confidence_threshold;
    if !passes {
        return None;
    }
    let bbox = anchor.to_bbox();
    let bbox = match rescale {
        Some(rescale) => rescale.apply(&bbox),
        None => bbox,
    };
    Some(Detection {
        bbox,
        score: anchor.confidence,
        anchor: anchor.index,
    })
}

/// Keeps anchors with `confidence >= confidence_threshold`, in input order,
/// converted to corner-form detections.
pub fn filter_anchors(
    anchors: &[Anchor],
    confidence_threshold: f32,
    rescale: Option<&Rescale>,
) -> Vec<Detection> {
    anchors
        .iter()
        .filter_map(|anchor| keep(anchor, confidence_threshold, rescale))
        .collect()
}

/// Parallel counterpart of [`filter_anchors`]; output order is unchanged.
#[cfg(feature = "rayon")]
pub fn filter_anchors_par(
    anchors: &[Anchor],
    confidence_threshold: f32,
    rescale: Option<&Rescale>,
) -> Vec<Detection> {
    anchors
        .par_iter()
        .filter_map(|anchor| keep(anchor, confidence_threshold, rescale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::filter_anchors;
    use crate::decode::Anchor;
    use crate::geometry::Rescale;

    fn anchor(index: usize, confidence: f32) -> Anchor {
        Anchor {
            index,
            center_x: 10.0,
            center_y: 20.0,
            width: 4.0,
            height: 8.0,
            confidence,
        }
    }

    #[test]
    fn threshold_is_inclusive_and_order_preserving() {
        let anchors = [anchor(0, 0.9), anchor(1, 0.5), anchor(2, 0.84), anchor(3, f32::NAN)];
        let kept = filter_anchors(&anchors, 0.84, None);
        let indices: Vec<usize> = kept.iter().map(|d| d.anchor).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(kept[0].bbox.to_array(), [8.0, 16.0, 12.0, 24.0]);
        assert_eq!(kept[1].score, 0.84);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let anchors = [anchor(0, 0.1), anchor(1, 0.2)];
        assert!(filter_anchors(&anchors, 0.7, None).is_empty());
    }

    #[test]
    fn rescale_applies_to_kept_boxes() {
        let anchors = [anchor(0, 0.9)];
        let rescale = Rescale::from_square_model(640.0, 1280.0, 640.0);
        let kept = filter_anchors(&anchors, 0.5, Some(&rescale));
        assert_eq!(kept[0].bbox.to_array(), [16.0, 16.0, 24.0, 24.0]);
    }
}
