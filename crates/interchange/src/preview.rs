//! Raster previews embedded in documents and stored next to them.

use crate::{MapError, Result};
use image::{ImageFormat, Rgba, RgbaImage};
use log::warn;
use std::io::Cursor;

/// Canvas background color, used for placeholders.
pub const BACKGROUND: Rgba<u8> = Rgba([35, 30, 54, 255]);

/// A rendered snapshot of a map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Preview {
    bytes: Vec<u8>,
    placeholder: bool,
}

impl Preview {
    /// Wraps encoded image bytes (PNG or JPEG).
    ///
    /// Fails with [MapError::MissingAsset] if the bytes don't decode.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        image::load_from_memory(&bytes).map_err(|e| MapError::MissingAsset(e.to_string()))?;
        Ok(Self {
            bytes,
            placeholder: false,
        })
    }

    /// Like [Preview::from_bytes], falling back to the placeholder.
    pub fn or_placeholder(bytes: Vec<u8>) -> Self {
        Self::from_bytes(bytes).unwrap_or_else(|e| {
            warn!("{e}; using placeholder preview");
            Self::placeholder()
        })
    }

    /// A single background-colored pixel.
    pub fn placeholder() -> Self {
        let bytes = encode_png(&RgbaImage::from_pixel(1, 1, BACKGROUND)).unwrap_or_default();
        Self {
            bytes,
            placeholder: true,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    /// Pixel dimensions, if the bytes decode.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        image::load_from_memory(&self.bytes)
            .ok()
            .map(|image| (image.width(), image.height()))
    }
}

/// Encodes an RGBA buffer as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| MapError::MissingAsset(format!("failed to encode preview: {e}")))?;
    Ok(out.into_inner())
}
