use std::process::ExitCode;

use clap::Parser;
use image::{Rgb, RgbImage};
use xray_backend::cli::{self, Args, DiagnoseError};
use xray_backend::error::ModelLoadError;

fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("diagnose").chain(args.iter().copied())).unwrap()
}

#[test]
fn missing_model_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("scan.png");
    RgbImage::from_pixel(32, 32, Rgb([200, 200, 200]))
        .save(&image)
        .unwrap();
    let model = dir.path().join("missing.onnx");

    let args = parse(&[
        "--image",
        image.to_str().unwrap(),
        "--model",
        model.to_str().unwrap(),
    ]);

    let err = cli::run(&args).unwrap_err();
    assert!(matches!(err, DiagnoseError::ModelLoad(ModelLoadError::NotFound(_))));
    assert!(err.to_string().starts_with("Error loading model"), "got {err}");
    assert_eq!(cli::execute(&args), ExitCode::FAILURE);
}

#[test]
fn text_file_as_image_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("notes.txt");
    std::fs::write(&image, "not an x-ray").unwrap();
    let model = dir.path().join("missing.onnx");

    let args = parse(&["-i", image.to_str().unwrap(), "-m", model.to_str().unwrap()]);
    let err = cli::run(&args).unwrap_err();
    assert!(err.to_string().starts_with("Unable to load image"), "got {err}");
    assert_eq!(cli::execute(&args), ExitCode::FAILURE);
}

#[test]
fn explicit_model_flag_wins() {
    let args = parse(&["-i", "scan.png", "-m", "/models/xray.onnx"]);
    assert_eq!(args.model, std::path::PathBuf::from("/models/xray.onnx"));
    assert!(args.font.is_none());
}

#[test]
fn model_path_can_come_from_the_environment() {
    use clap::CommandFactory;

    let command = Args::command();
    let model = command
        .get_arguments()
        .find(|arg| arg.get_id() == "model")
        .unwrap();
    assert_eq!(model.get_env(), Some(std::ffi::OsStr::new("MODEL_PATH")));
}
