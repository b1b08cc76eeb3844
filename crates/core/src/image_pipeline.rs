//! Upload image normalisation: decode, bound the dimensions, re-encode as WebP.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::CoreError;

/// Longest edge, in pixels, of a stored image.
pub const MAX_DIMENSION: u32 = 1600;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME type of every processed image.
pub const WEBP_CONTENT_TYPE: &str = "image/webp";

/// File extension of every processed image.
pub const WEBP_EXTENSION: &str = "webp";

/// An image ready to be written to object storage.
#[derive(Debug, Clone)]
pub struct ProcessedImage {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode `data`, shrink it to fit within `max_dimension` on both axes, and
/// encode it as WebP.
///
/// Aspect ratio is preserved and images are never upscaled.
pub fn to_webp(data: &[u8], max_dimension: u32) -> Result<ProcessedImage, CoreError> {
    if data.is_empty() {
        return Err(CoreError::Validation("Empty file".into()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Validation(format!(
            "File too large: {} bytes (max {MAX_UPLOAD_BYTES})",
            data.len()
        )));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| CoreError::Validation(format!("Invalid image: {e}")))?;

    let img = fit_within(img, max_dimension);
    let (width, height) = img.dimensions();

    // The WebP encoder only accepts 8-bit buffers.
    let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
    let mut buffer = Cursor::new(Vec::new());
    rgba.write_to(&mut buffer, ImageFormat::WebP)
        .map_err(|e| CoreError::Internal(format!("WebP encoding failed: {e}")))?;

    Ok(ProcessedImage {
        bytes: buffer.into_inner(),
        width,
        height,
    })
}

fn fit_within(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    if img.width() <= max_dimension && img.height() <= max_dimension {
        return img;
    }
    img.resize(max_dimension, max_dimension, FilterType::Lanczos3)
}
