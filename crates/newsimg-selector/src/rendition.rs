//! Display renditions: decode, downscale, re-encode as JPEG.
//!
//! Everything here is CPU-bound and synchronous; callers run it on the
//! blocking pool.

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError};

const JPEG_QUALITY: u8 = 88;
const FALLBACK_EXTENSION: &str = "jpg";

/// Output of [`render`].
#[derive(Debug, Clone)]
pub struct Rendition {
    /// JPEG-encoded display image.
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Dimensions of the decoded source.
    pub source_width: u32,
    pub source_height: u32,
}

/// Fits `width x height` inside a `max_side` square.
///
/// Images already within bounds are returned unchanged. Otherwise each side
/// is scaled by `max_side / longest` and floored, never below 1.
#[must_use]
pub fn fit_within(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_side || longest == 0 {
        return (width, height);
    }
    let scale = |side: u32| {
        let scaled = u64::from(side) * u64::from(max_side) / u64::from(longest);
        u32::try_from(scaled).unwrap_or(max_side).max(1)
    };
    (scale(width), scale(height))
}

/// File extension for the sniffed format of `bytes`; `jpg` when unknown.
#[must_use]
pub fn extension_for(bytes: &[u8]) -> &'static str {
    image::guess_format(bytes)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or(FALLBACK_EXTENSION)
}

/// Decodes `bytes` and produces a JPEG rendition whose longest side is at
/// most `max_side`.
///
/// # Errors
///
/// Returns [`ImageError`] if the bytes are not a supported image or the
/// JPEG encoder fails.
pub fn render(bytes: &[u8], max_side: u32) -> Result<Rendition, ImageError> {
    let decoded = image::load_from_memory(bytes)?;
    let (source_width, source_height) = (decoded.width(), decoded.height());
    let (width, height) = fit_within(source_width, source_height, max_side);

    let resized = if (width, height) == (source_width, source_height) {
        decoded
    } else {
        decoded.resize_exact(width, height, FilterType::Lanczos3)
    };
    // JPEG has no alpha channel.
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

    let mut jpeg = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY))?;

    Ok(Rendition {
        jpeg,
        width,
        height,
        source_width,
        source_height,
    })
}
