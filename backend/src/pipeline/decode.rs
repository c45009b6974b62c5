use std::io::Cursor;
use std::path::Path;

use image::{ImageReader, RgbImage};

use crate::error::InvalidImageError;

/// Decodes an encoded image (JPEG, PNG, ...) into 8-bit RGB.
///
/// The format is sniffed from the content, never from a file name or a
/// client-supplied content type.
pub fn decode_image(bytes: &[u8]) -> Result<RgbImage, InvalidImageError> {
    if bytes.is_empty() {
        return Err(InvalidImageError::Empty);
    }

    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    Ok(image.to_rgb8())
}

pub fn decode_image_file(path: &Path) -> Result<RgbImage, InvalidImageError> {
    let bytes = std::fs::read(path)?;
    decode_image(&bytes)
}
