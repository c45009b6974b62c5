use std::fmt;
use std::str::FromStr;

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;
use serde::Deserialize;

use crate::error::InvalidImageError;

pub const INPUT_HEIGHT: usize = 224;
pub const INPUT_WIDTH: usize = 224;
pub const INPUT_CHANNELS: usize = 3;

/// NHWC shape of the single-sample batch the model consumes.
pub const INPUT_SHAPE: [usize; 4] = [1, INPUT_HEIGHT, INPUT_WIDTH, INPUT_CHANNELS];

/// Interpolation used when scaling to the model resolution.
///
/// All variants are deterministic; `Triangle` (bilinear) is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull_rom" | "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(format!("unknown resize filter: {other}")),
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResizeFilter::Nearest => "nearest",
            ResizeFilter::Triangle => "triangle",
            ResizeFilter::CatmullRom => "catmull_rom",
            ResizeFilter::Gaussian => "gaussian",
            ResizeFilter::Lanczos3 => "lanczos3",
        };
        f.write_str(name)
    }
}

/// Resizes to 224x224 and lays the pixels out as a (1, 224, 224, 3) batch
/// scaled from [0, 255] to [0.0, 1.0].
pub fn preprocess(image: &RgbImage, filter: ResizeFilter) -> Result<Array4<f32>, InvalidImageError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(InvalidImageError::ZeroDimension { width, height });
    }

    let resized = imageops::resize(image, INPUT_WIDTH as u32, INPUT_HEIGHT as u32, filter.into());

    let tensor = Array4::from_shape_fn(
        (1, INPUT_HEIGHT, INPUT_WIDTH, INPUT_CHANNELS),
        |(_, y, x, c)| resized.get_pixel(x as u32, y as u32)[c] as f32 / 255.0,
    );
    Ok(tensor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        })
    }

    #[test]
    fn output_shape_is_fixed_for_any_resolution() {
        for (w, h) in [(1, 1), (50, 50), (224, 224), (640, 480), (97, 1301)] {
            let tensor = preprocess(&gradient(w, h), ResizeFilter::default()).unwrap();
            assert_eq!(tensor.shape(), &INPUT_SHAPE, "for {w}x{h}");
            assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)), "for {w}x{h}");
        }
    }

    #[test]
    fn extreme_pixels_map_to_unit_interval_bounds() {
        let white = RgbImage::from_pixel(50, 50, Rgb([255, 255, 255]));
        let tensor = preprocess(&white, ResizeFilter::Triangle).unwrap();
        assert!(tensor.iter().all(|&v| v == 1.0));

        let black = RgbImage::from_pixel(300, 10, Rgb([0, 0, 0]));
        let tensor = preprocess(&black, ResizeFilter::Lanczos3).unwrap();
        assert!(tensor.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn channels_keep_rgb_order() {
        let image = RgbImage::from_pixel(10, 10, Rgb([255, 0, 51]));
        let tensor = preprocess(&image, ResizeFilter::Nearest).unwrap();
        assert_eq!(tensor[[0, 100, 100, 0]], 1.0);
        assert_eq!(tensor[[0, 100, 100, 1]], 0.0);
        assert_eq!(tensor[[0, 100, 100, 2]], 0.2);
    }

    #[test]
    fn native_resolution_is_copied_verbatim() {
        let image = gradient(224, 224);
        let tensor = preprocess(&image, ResizeFilter::Triangle).unwrap();
        assert_eq!(tensor[[0, 10, 20, 0]], 20.0 / 255.0);
        assert_eq!(tensor[[0, 10, 20, 1]], 10.0 / 255.0);
        assert_eq!(tensor[[0, 10, 20, 2]], 30.0 / 255.0);
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let image = gradient(333, 211);
        let first = preprocess(&image, ResizeFilter::CatmullRom).unwrap();
        let second = preprocess(&image, ResizeFilter::CatmullRom).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let err = preprocess(&RgbImage::new(0, 12), ResizeFilter::default()).unwrap_err();
        assert!(matches!(
            err,
            InvalidImageError::ZeroDimension { width: 0, height: 12 }
        ));
    }

    #[test]
    fn filter_names_parse() {
        assert_eq!("bilinear".parse::<ResizeFilter>(), Ok(ResizeFilter::Triangle));
        assert_eq!("Lanczos3".parse::<ResizeFilter>(), Ok(ResizeFilter::Lanczos3));
        assert_eq!("catmull_rom".parse::<ResizeFilter>(), Ok(ResizeFilter::CatmullRom));
        assert!("cubic-ish".parse::<ResizeFilter>().is_err());
        assert_eq!(ResizeFilter::CatmullRom.to_string(), "catmull_rom");
    }
}
