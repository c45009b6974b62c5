use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use shared::Diagnosis;

use crate::pipeline::Prediction;

pub const RESULT_SIZE: u32 = 600;
const FRAME_THICKNESS: u32 = 8;
const FONT_SCALE: f32 = 32.0;
/// Top-left of the label; with a 32 px font the baseline lands near y = 50.
pub const TEXT_POS: (i32, i32) = (25, 26);

const SYSTEM_FONT_PATHS: [&str; 5] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

#[derive(Debug, thiserror::Error)]
pub enum AnnotateError {
    #[error("Failed to read font file {}: {source}", .path.display())]
    FontIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse font file: {}", .0.display())]
    InvalidFont(PathBuf),
}

pub fn label_color(diagnosis: Diagnosis) -> Rgb<u8> {
    match diagnosis {
        Diagnosis::Normal => Rgb([0, 255, 0]),
        Diagnosis::Pneumonia => Rgb([255, 0, 0]),
    }
}

pub fn load_font(path: &Path) -> Result<FontVec, AnnotateError> {
    let font_data = std::fs::read(path).map_err(|source| AnnotateError::FontIo {
        path: path.to_path_buf(),
        source,
    })?;
    FontVec::try_from_vec(font_data).map_err(|_| AnnotateError::InvalidFont(path.to_path_buf()))
}

/// First usable font from the common system locations, if any.
pub fn load_system_font() -> Option<FontVec> {
    for path in SYSTEM_FONT_PATHS {
        if let Ok(font) = load_font(Path::new(path)) {
            log::info!("Loaded system font: {}", path);
            return Some(font);
        }
    }

    log::debug!("No system font found, the label will not be drawn");
    None
}

/// Scales the X-ray to 600x600 and frames it in the diagnosis color. The
/// prediction text is drawn top-left when a font is available.
pub fn annotate(image: &RgbImage, prediction: &Prediction, font: Option<&FontVec>) -> RgbImage {
    let mut canvas = imageops::resize(image, RESULT_SIZE, RESULT_SIZE, FilterType::Triangle);
    let color = label_color(prediction.label());

    for inset in 0..FRAME_THICKNESS {
        let rect = Rect::at(inset as i32, inset as i32)
            .of_size(RESULT_SIZE - 2 * inset, RESULT_SIZE - 2 * inset);
        draw_hollow_rect_mut(&mut canvas, rect, color);
    }

    if let Some(font) = font {
        draw_text_mut(
            &mut canvas,
            color,
            TEXT_POS.0,
            TEXT_POS.1,
            FONT_SCALE,
            font,
            &prediction.to_string(),
        );
    }
    canvas
}

/// `scans/chest.jpeg` -> `scans/chest_result.png`
pub fn default_output_path(image_path: &Path) -> PathBuf {
    let stem = image_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("xray");
    image_path.with_file_name(format!("{stem}_result.png"))
}
