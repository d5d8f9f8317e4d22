//! Photo normalisation: decode, convert to RGB, resize, PNG-encode.
//!
//! The target is a 2.5 in × 3.5 in portrait at 75 dpi. The aspect ratio of
//! the source is not preserved; facesheet photos are already portrait crops
//! and the slide layout reserves exactly this box.

use crate::deck::PngImage;
use image::imageops::{self, FilterType};
use image::DynamicImage;
use tracing::debug;

/// Target width in pixels (`2.5 × 75`).
pub const PHOTO_WIDTH: u32 = 187;

/// Target height in pixels (`3.5 × 75`, rounded down).
pub const PHOTO_HEIGHT: u32 = 262;

/// Decode `blob` (any format `image` recognises) and re-encode it as a
/// 187×262 RGB PNG, resampled with Lanczos3.
pub fn normalize_photo(blob: &[u8]) -> Result<PngImage, image::ImageError> {
    let decoded = image::load_from_memory(blob)?;
    debug!(
        "Decoded photo {}x{} ({:?}), {} bytes",
        decoded.width(),
        decoded.height(),
        decoded.color(),
        blob.len()
    );

    let rgb = decoded.to_rgb8();
    let resized = if rgb.dimensions() == (PHOTO_WIDTH, PHOTO_HEIGHT) {
        rgb
    } else {
        imageops::resize(&rgb, PHOTO_WIDTH, PHOTO_HEIGHT, FilterType::Lanczos3)
    };

    PngImage::encode(&DynamicImage::ImageRgb8(resized))
}
