use clap::Parser;
use detpost::{DetectionSet, OwnedTensor, PostprocessConfig, Postprocessor, Rescale};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "Detector output post-processing (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Override the tensor path from the config.
    #[arg(short, long, value_name = "FILE")]
    tensor: Option<PathBuf>,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
enum TensorFormat {
    /// `{"shape": [...], "data": [...]}`
    #[default]
    Json,
    /// Raw little-endian f32 values; `shape` must be given in the config.
    F32le,
}

#[derive(Debug, Deserialize)]
struct JsonTensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct PostprocessConfigJson {
    confidence_threshold: f32,
    iou_threshold: f32,
    max_output_size: usize,
    parallel: bool,
}

impl Default for PostprocessConfigJson {
    fn default() -> Self {
        let cfg = PostprocessConfig::default();
        Self {
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            max_output_size: cfg.max_output_size,
            parallel: cfg.parallel,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RescaleJson {
    #[serde(default = "default_model_size")]
    model_width: f32,
    #[serde(default = "default_model_size")]
    model_height: f32,
    original_width: f32,
    original_height: f32,
}

fn default_model_size() -> f32 {
    640.0
}

impl From<RescaleJson> for Rescale {
    fn from(value: RescaleJson) -> Self {
        Rescale {
            model_width: value.model_width,
            model_height: value.model_height,
            original_width: value.original_width,
            original_height: value.original_height,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    tensor_format: TensorFormat,
    shape: Option<Vec<usize>>,
    output_path: Option<String>,
    postprocess: PostprocessConfigJson,
    rescale: Option<RescaleJson>,
}

/// Same layout as the detection endpoint response.
#[derive(Debug, Serialize)]
struct Output {
    boxes: Vec<[f32; 4]>,
    scores: Vec<f32>,
}

impl From<&DetectionSet> for Output {
    fn from(set: &DetectionSet) -> Self {
        Self {
            boxes: set.boxes(),
            scores: set.scores(),
        }
    }
}

fn load_tensor(
    path: &Path,
    format: &TensorFormat,
    shape: Option<&[usize]>,
) -> Result<OwnedTensor, Box<dyn std::error::Error>> {
    match format {
        TensorFormat::Json => {
            let text = fs::read_to_string(path)?;
            let tensor: JsonTensor = serde_json::from_str(&text)?;
            Ok(OwnedTensor::from_shape(tensor.data, &tensor.shape)?)
        }
        TensorFormat::F32le => {
            let shape = shape.ok_or("shape must be set in the config for f32le tensors")?;
            let bytes = fs::read(path)?;
            if bytes.len() % 4 != 0 {
                return Err(format!("{} is not a whole number of f32 values", path.display()).into());
            }
            let data = bytes
                .chunks_exact(4)
                .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect();
            Ok(OwnedTensor::from_shape(data, shape)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("detpost=debug".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    let tensor_path = match cli.tensor {
        Some(path) => path,
        None if !config.tensor_path.is_empty() => PathBuf::from(&config.tensor_path),
        None => return Err("tensor_path must be set in the config or via --tensor".into()),
    };

    let tensor = load_tensor(&tensor_path, &config.tensor_format, config.shape.as_deref())?;
    info!(anchors = tensor.num_anchors(), path = %tensor_path.display(), "loaded tensor");

    let mut cfg = PostprocessConfig {
        confidence_threshold: config.postprocess.confidence_threshold,
        iou_threshold: config.postprocess.iou_threshold,
        max_output_size: config.postprocess.max_output_size,
        parallel: config.postprocess.parallel,
        rescale: None,
    };
    if let Some(rescale) = config.rescale {
        cfg = cfg.with_rescale(rescale.into());
    }

    let set = Postprocessor::new().with_config(cfg).run(tensor.view())?;
    info!(detections = set.len(), "post-processing finished");

    let json = serde_json::to_string_pretty(&Output::from(&set))?;
    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
