//! Python bindings for detpost.
//!
//! Takes the detector's output array straight from numpy and returns
//! `(boxes, scores)` arrays, the same pair the detection endpoint serves.

use numpy::{PyArray1, PyArray2, PyArrayMethods, PyReadonlyArrayDyn, PyUntypedArrayMethods};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use detpost::{
    DetPostError, DetectionSet, ErrorKind, PostprocessConfig as RustPostprocessConfig,
    Postprocessor as RustPostprocessor, RawTensor, Rescale,
};

type BoxesAndScores<'py> = (Bound<'py, PyArray2<f32>>, Bound<'py, PyArray1<f32>>);

/// Convert a DetPostError to a Python exception.
fn to_py_err(err: DetPostError) -> PyErr {
    match err.kind() {
        ErrorKind::Shape | ErrorKind::Config => PyValueError::new_err(err.to_string()),
        ErrorKind::Inference => PyRuntimeError::new_err(err.to_string()),
    }
}

fn to_arrays<'py>(py: Python<'py>, set: &DetectionSet) -> PyResult<BoxesAndScores<'py>> {
    let flat: Vec<f32> = set.boxes().into_iter().flatten().collect();
    let boxes = PyArray1::from_vec(py, flat).reshape([set.len(), 4])?;
    let scores = PyArray1::from_vec(py, set.scores());
    Ok((boxes, scores))
}

fn run_on_array<'py>(
    py: Python<'py>,
    pp: &RustPostprocessor,
    tensor: &PyReadonlyArrayDyn<'py, f32>,
) -> PyResult<BoxesAndScores<'py>> {
    let shape = tensor.shape().to_vec();
    let data = tensor.as_slice()?;
    let view = RawTensor::from_shape(data, &shape).map_err(to_py_err)?;
    let set = pp.run(view).map_err(to_py_err)?;
    to_arrays(py, &set)
}

fn build_config(
    confidence_threshold: f32,
    iou_threshold: f32,
    max_output_size: usize,
    parallel: bool,
    original_size: Option<(f32, f32)>,
    model_size: (f32, f32),
) -> PyResult<RustPostprocessConfig> {
    let mut cfg = RustPostprocessConfig {
        confidence_threshold,
        iou_threshold,
        max_output_size,
        parallel,
        rescale: None,
    };
    if let Some((original_width, original_height)) = original_size {
        cfg = cfg.with_rescale(Rescale {
            model_width: model_size.0,
            model_height: model_size.1,
            original_width,
            original_height,
        });
    }
    cfg.validate().map_err(to_py_err)?;
    Ok(cfg)
}

/// Thresholds and options for post-processing.
#[pyclass]
#[derive(Clone)]
pub struct PostprocessConfig {
    inner: RustPostprocessConfig,
}

#[pymethods]
impl PostprocessConfig {
    /// Create a new PostprocessConfig.
    ///
    /// Args:
    ///     confidence_threshold: Minimum anchor confidence (default: 0.84)
    ///     iou_threshold: NMS overlap threshold (default: 0.5)
    ///     max_output_size: Maximum boxes returned (default: 100)
    ///     parallel: Decode and filter in parallel (default: False)
    ///     original_size: (width, height) of the source image; enables rescaling (default: None)
    ///     model_size: (width, height) of the model input (default: (640, 640))
    #[new]
    #[pyo3(signature = (
        confidence_threshold = 0.84,
        iou_threshold = 0.5,
        max_output_size = 100,
        parallel = false,
        original_size = None,
        model_size = (640.0, 640.0)
    ))]
    fn new(
        confidence_threshold: f32,
        iou_threshold: f32,
        max_output_size: usize,
        parallel: bool,
        original_size: Option<(f32, f32)>,
        model_size: (f32, f32),
    ) -> PyResult<Self> {
        let inner = build_config(
            confidence_threshold,
            iou_threshold,
            max_output_size,
            parallel,
            original_size,
            model_size,
        )?;
        Ok(Self { inner })
    }

    /// Preset used by the debris detector (confidence 0.84).
    #[staticmethod]
    fn debris() -> Self {
        Self {
            inner: RustPostprocessConfig::debris(),
        }
    }

    /// Preset used by the relaxed detector (confidence 0.7).
    #[staticmethod]
    fn relaxed() -> Self {
        Self {
            inner: RustPostprocessConfig::relaxed(),
        }
    }

    #[getter]
    fn confidence_threshold(&self) -> f32 {
        self.inner.confidence_threshold
    }

    #[getter]
    fn iou_threshold(&self) -> f32 {
        self.inner.iou_threshold
    }

    #[getter]
    fn max_output_size(&self) -> usize {
        self.inner.max_output_size
    }

    fn __repr__(&self) -> String {
        format!(
            "PostprocessConfig(confidence_threshold={}, iou_threshold={}, max_output_size={}, parallel={}, rescale={})",
            self.inner.confidence_threshold,
            self.inner.iou_threshold,
            self.inner.max_output_size,
            self.inner.parallel,
            self.inner.rescale.is_some()
        )
    }
}

/// Reusable post-processor bound to one configuration.
#[pyclass]
pub struct Postprocessor {
    inner: RustPostprocessor,
}

#[pymethods]
impl Postprocessor {
    /// Args:
    ///     config: PostprocessConfig (default: PostprocessConfig())
    #[new]
    #[pyo3(signature = (config = None))]
    fn new(config: Option<PostprocessConfig>) -> PyResult<Self> {
        let cfg = config.map(|c| c.inner).unwrap_or_default();
        cfg.validate().map_err(to_py_err)?;
        Ok(Self {
            inner: RustPostprocessor::new().with_config(cfg),
        })
    }

    /// Post-process one detector output.
    ///
    /// Args:
    ///     tensor: float32 array of shape (5, N) or (1, 5, N)
    ///
    /// Returns:
    ///     (boxes, scores): (K, 4) and (K,) float32 arrays, best first
    fn run<'py>(
        &self,
        py: Python<'py>,
        tensor: PyReadonlyArrayDyn<'py, f32>,
    ) -> PyResult<BoxesAndScores<'py>> {
        run_on_array(py, &self.inner, &tensor)
    }

    fn __repr__(&self) -> String {
        let cfg = self.inner.config();
        format!(
            "Postprocessor(confidence_threshold={}, iou_threshold={}, max_output_size={})",
            cfg.confidence_threshold, cfg.iou_threshold, cfg.max_output_size
        )
    }
}

/// Convenience function for a single tensor.
///
/// Args:
///     tensor: float32 array of shape (5, N) or (1, 5, N)
///     confidence_threshold: Minimum anchor confidence (default: 0.84)
///     iou_threshold: NMS overlap threshold (default: 0.5)
///     max_output_size: Maximum boxes returned (default: 100)
///     original_size: (width, height) of the source image; enables rescaling (default: None)
///     model_size: (width, height) of the model input (default: (640, 640))
///
/// Returns:
///     (boxes, scores): (K, 4) and (K,) float32 arrays, best first
#[pyfunction]
#[pyo3(signature = (
    tensor,
    confidence_threshold = 0.84,
    iou_threshold = 0.5,
    max_output_size = 100,
    original_size = None,
    model_size = (640.0, 640.0)
))]
fn postprocess<'py>(
    py: Python<'py>,
    tensor: PyReadonlyArrayDyn<'py, f32>,
    confidence_threshold: f32,
    iou_threshold: f32,
    max_output_size: usize,
    original_size: Option<(f32, f32)>,
    model_size: (f32, f32),
) -> PyResult<BoxesAndScores<'py>> {
    let cfg = build_config(
        confidence_threshold,
        iou_threshold,
        max_output_size,
        false,
        original_size,
        model_size,
    )?;
    let pp = RustPostprocessor::new().with_config(cfg);
    run_on_array(py, &pp, &tensor)
}

/// Python module for detpost.
#[pymodule]
fn _detpost(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PostprocessConfig>()?;
    m.add_class::<Postprocessor>()?;
    m.add_function(wrap_pyfunction!(postprocess, m)?)?;

    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
