//! Greedy IoU non-maximum suppression.
//!
//! Candidates are visited in descending score order and kept unless they
//! overlap an already-kept box with IoU at or above the threshold. This is the
//! same selection as repeatedly taking the best survivor and discarding its
//! overlaps. Cost is quadratic in the number of candidates, which stays small
//! after confidence filtering.

use crate::candidate::{sort_detections_desc, Detection};
use crate::geometry::BBox;
use crate::pipeline::config::check_nms_params;
use crate::util::{DetPostError, DetPostResult};

/// Applies greedy NMS, returning at most `max_output_size` detections in
/// selection order.
///
/// `candidates` is sorted in place. Parameters are not validated here; see
/// [`crate::PostprocessConfig::validate`].
pub fn non_max_suppression(
    candidates: &mut [Detection],
    max_output_size: usize,
    iou_threshold: f32,
) -> Vec<Detection> {
    sort_detections_desc(candidates);
    let mut kept: Vec<Detection> = Vec::with_capacity(max_output_size.min(candidates.len()));

    'outer: for candidate in candidates.iter().copied() {
        if kept.len() >= max_output_size {
            break;
        }
        for selected in kept.iter() {
            if selected.bbox.iou(&candidate.bbox) >= iou_threshold {
                continue 'outer;
            }
        }
        kept.push(candidate);
    }

    kept
}

/// Index-returning NMS over parallel box and score slices.
///
/// Returns indices into `boxes` of the kept entries, highest score first.
pub fn nms_indices(
    boxes: &[BBox],
    scores: &[f32],
    max_output_size: usize,
    iou_threshold: f32,
) -> DetPostResult<Vec<usize>> {
    if boxes.len() != scores.len() {
        return Err(DetPostError::ScoreCountMismatch {
            boxes: boxes.len(),
            scores: scores.len(),
        });
    }
    check_nms_params(max_output_size, iou_threshold)?;

    let mut candidates: Vec<Detection> = boxes
        .iter()
        .zip(scores.iter())
        .enumerate()
        .map(|(anchor, (bbox, score))| Detection {
            bbox: *bbox,
            score: *score,
            anchor,
        })
        .collect();
    let kept = non_max_suppression(&mut candidates, max_output_size, iou_threshold);
    Ok(kept.into_iter().map(|d| d.anchor).collect())
}
