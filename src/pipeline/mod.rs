//! The decode, filter and suppress pipeline.
//!
//! `Postprocessor` owns only its configuration; every call works on borrowed
//! input and returns freshly allocated output, so one instance can serve any
//! number of threads.

use crate::candidate::filter::filter_anchors;
#[cfg(feature = "rayon")]
use crate::candidate::filter::filter_anchors_par;
use crate::candidate::nms::non_max_suppression;
use crate::candidate::Detection;
use crate::decode::{decode, Anchor};
#[cfg(feature = "rayon")]
use crate::decode::rayon::decode_par;
use crate::model::Model;
use crate::tensor::RawTensor;
use crate::trace::{trace_event, trace_reject, trace_span};
use crate::util::{DetPostError, DetPostResult};

pub mod config;

pub use config::PostprocessConfig;

/// Final detections in selection order (highest score first).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DetectionSet {
    items: Vec<Detection>,
}

impl DetectionSet {
    /// Number of detections.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true when nothing survived filtering.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Highest-scoring detection.
    pub fn best(&self) -> Option<&Detection> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Detection] {
        &self.items
    }

    /// Boxes as `[x_min, y_min, x_max, y_max]` rows, index-aligned with [`Self::scores`].
    pub fn boxes(&self) -> Vec<[f32; 4]> {
        self.items.iter().map(|d| d.bbox.to_array()).collect()
    }

    /// Scores, index-aligned with [`Self::boxes`].
    pub fn scores(&self) -> Vec<f32> {
        self.items.iter().map(|d| d.score).collect()
    }

    pub fn into_vec(self) -> Vec<Detection> {
        self.items
    }
}

impl From<Vec<Detection>> for DetectionSet {
    fn from(items: Vec<Detection>) -> Self {
        Self { items }
    }
}

impl IntoIterator for DetectionSet {
    type Item = Detection;
    type IntoIter = std::vec::IntoIter<Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Configured post-processor for a single-class detector.
#[derive(Clone, Debug, Default)]
pub struct Postprocessor {
    cfg: PostprocessConfig,
}

impl Postprocessor {
    /// Creates a post-processor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration. Validation happens on each run.
    pub fn with_config(mut self, cfg: PostprocessConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &PostprocessConfig {
        &self.cfg
    }

    /// Runs decode, filter and NMS over one tensor.
    pub fn run(&self, tensor: RawTensor<'_>) -> DetPostResult<DetectionSet> {
        let cfg = &self.cfg;
        cfg.validate()?;

        let _span = trace_span!(
            "postprocess",
            anchors = tensor.num_anchors(),
            confidence_threshold = cfg.confidence_threshold
        )
        .entered();

        let anchors = self.decode_stage(tensor);
        let mut candidates = self.filter_stage(&anchors);
        trace_event!("filtered", candidates = candidates.len());

        if candidates.is_empty() {
            return Ok(DetectionSet::default());
        }

        let kept = non_max_suppression(&mut candidates, cfg.max_output_size, cfg.iou_threshold);
        trace_event!("suppressed", kept = kept.len());
        Ok(DetectionSet::from(kept))
    }

    /// Runs inference through `model`, then post-processes its output.
    pub fn detect<M: Model>(&self, model: &M, input: &M::Input) -> DetPostResult<DetectionSet> {
        let tensor = model.infer(input).map_err(|err| {
            let err = DetPostError::Inference {
                reason: err.to_string(),
            };
            trace_reject!(err);
            err
        })?;
        self.run(tensor.view())
    }

    #[cfg(feature = "rayon")]
    fn decode_stage(&self, tensor: RawTensor<'_>) -> Vec<Anchor> {
        if self.cfg.parallel {
            decode_par(tensor)
        } else {
            decode(tensor)
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn decode_stage(&self, tensor: RawTensor<'_>) -> Vec<Anchor> {
        decode(tensor)
    }

    #[cfg(feature = "rayon")]
    fn filter_stage(&self, anchors: &[Anchor]) -> Vec<Detection> {
        let cfg = &self.cfg;
        if cfg.parallel {
            filter_anchors_par(anchors, cfg.confidence_threshold, cfg.rescale.as_ref())
        } else {
            filter_anchors(anchors, cfg.confidence_threshold, cfg.rescale.as_ref())
        }
    }

    #[cfg(not(feature = "rayon"))]
    fn filter_stage(&self, anchors: &[Anchor]) -> Vec<Detection> {
        let cfg = &self.cfg;
        filter_anchors(anchors, cfg.confidence_threshold, cfg.rescale.as_ref())
    }
}

/// One-shot helper: `Postprocessor::new().with_config(*cfg).run(tensor)`.
pub fn postprocess(tensor: RawTensor<'_>, cfg: &PostprocessConfig) -> DetPostResult<DetectionSet> {
    Postprocessor::new().with_config(*cfg).run(tensor)
}
