//! Carrier image boundary: decode to RGBA8, re-encode as lossless PNG.
//!
//! The codec itself only sees raw pixel buffers; this module is the seam to
//! the filesystem used by the CLI. Output is always PNG — any lossy
//! recompression between embed and extract destroys the LSB stream.

use image::codecs::png::PngEncoder;
use image::metadata::Orientation;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageEncoder, ImageReader, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::CarrierError;

/// Load an image as RGBA8 with its EXIF orientation applied.
///
/// Orientation must be baked in before any LSB work so the pixel scan order
/// is the same on embed and extract regardless of how the file was shot.
pub fn load_rgba(path: &Path) -> Result<RgbaImage, CarrierError> {
    let reader = ImageReader::open(path)?;
    let mut decoder = reader.into_decoder()?;
    let orientation = decoder.orientation().unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder)?;
    img.apply_orientation(orientation);
    Ok(img.to_rgba8())
}

/// Encode a raw RGBA8 buffer as PNG bytes.
pub fn write_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, CarrierError> {
    let mut out = Cursor::new(Vec::new());
    let encoder = PngEncoder::new(&mut out);
    encoder.write_image(pixels, width, height, ExtendedColorType::Rgba8)?;
    Ok(out.into_inner())
}
