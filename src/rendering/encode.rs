//! JPEG encoding of the final composite

use crate::{Error, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, RgbaImage};

/// Largest width or height a baseline JPEG frame header can carry
pub const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Encode `img` as baseline JPEG. Alpha is dropped, so transparent
/// background comes out black. Same input, same bytes.
pub fn encode_jpeg(img: &RgbaImage, quality: u8) -> Result<Vec<u8>> {
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::EncodeError(format!(
            "cannot encode an empty {}x{} image",
            img.width(),
            img.height()
        )));
    }
    if img.width() > MAX_JPEG_DIMENSION || img.height() > MAX_JPEG_DIMENSION {
        return Err(Error::EncodeError(format!(
            "composite is {}x{}, JPEG allows at most {} px per side; too many plan pages",
            img.width(),
            img.height(),
            MAX_JPEG_DIMENSION
        )));
    }

    let rgb = DynamicImage::ImageRgba8(img.clone()).to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality)
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
        .map_err(|e| Error::EncodeError(e.to_string()))?;
    Ok(buf)
}
