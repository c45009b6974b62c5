//! `diagnose` command line front-end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use crate::annotate::{self, AnnotateError};
use crate::error::{InferenceError, InvalidImageError, ModelLoadError, PipelineError};
use crate::pipeline::{self, Model, ResizeFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Classify a chest X-ray as pneumonia or normal", long_about = None)]
pub struct Args {
    /// Path to the X-ray image.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Model artifact (.onnx, or .pt/.pth/.ts when built with the `torch` feature).
    #[arg(short, long, env = "MODEL_PATH", default_value = "pneumonia_detection.onnx")]
    pub model: PathBuf,

    /// Where to write the annotated image.
    /// Default: <image stem>_result.png next to the input.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// TrueType/OpenType font used to draw the label on the result image.
    /// Default: the first common system font found.
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Interpolation used to scale to 224x224.
    /// Supported: nearest, triangle, catmull_rom, gaussian, lanczos3
    #[arg(long, default_value = "triangle")]
    pub resize_filter: ResizeFilter,
}

#[derive(Debug, thiserror::Error)]
pub enum DiagnoseError {
    #[error("Error loading model: {0}")]
    ModelLoad(#[from] ModelLoadError),
    #[error("Unable to load image: {0}")]
    InvalidImage(#[from] InvalidImageError),
    #[error("Prediction failed: {0}")]
    Pipeline(#[from] PipelineError),
    #[error("Prediction failed: {0}")]
    Inference(#[from] InferenceError),
    #[error(transparent)]
    Font(#[from] AnnotateError),
    #[error("Failed to write {}: {source}", .path.display())]
    Save {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// Runs the command and maps any failure to a fatal message and a
/// non-zero exit code.
pub fn execute(args: &Args) -> ExitCode {
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

pub fn run(args: &Args) -> Result<(), DiagnoseError> {
    let font = match args.font.as_deref() {
        Some(path) => Some(annotate::load_font(path)?),
        None => annotate::load_system_font(),
    };
    let image = pipeline::decode_image_file(&args.image)?;
    let input = pipeline::preprocess(&image, args.resize_filter)?;

    let model = Model::load(&args.model)?;
    let scores = pipeline::invoke(Some(&model), &input)?;
    let prediction = pipeline::interpret(&scores)?;

    println!("Result: {}", prediction);

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| annotate::default_output_path(&args.image));
    annotate::annotate(&image, &prediction, font.as_ref())
        .save(&output)
        .map_err(|source| DiagnoseError::Save {
            path: output.clone(),
            source,
        })?;
    println!("Annotated image written to {}", output.display());
    Ok(())
}
