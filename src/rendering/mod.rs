//! Rendering: compositing plan images and encoding the result

pub mod compose;
pub mod encode;

use crate::Result;
use image::RgbaImage;
use sha2::{Digest, Sha256};

/// The encoded composite served for the lifetime of the process.
///
/// Built once at startup and only ever read afterwards.
#[derive(Debug, Clone)]
pub struct Composite {
    pub width: u32,
    pub height: u32,
    pub jpeg: Vec<u8>,
    /// Hex SHA-256 of `jpeg`, used as the HTTP entity tag
    pub etag: String,
}

impl Composite {
    pub fn from_image(img: &RgbaImage, quality: u8) -> Result<Self> {
        let jpeg = encode::encode_jpeg(img, quality)?;
        Ok(Self::from_jpeg(img.width(), img.height(), jpeg))
    }

    pub fn from_jpeg(width: u32, height: u32, jpeg: Vec<u8>) -> Self {
        let etag = hex::encode(Sha256::digest(&jpeg));
        Self {
            width,
            height,
            jpeg,
            etag,
        }
    }

    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }
}
