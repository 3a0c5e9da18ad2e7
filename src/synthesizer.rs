//! Raster synthesis for icons and splash screens.
//!
//! Everything here is a pure function of its inputs: no clocks, no
//! randomness, fixed encoder settings. Re-running a synthesis with the same
//! logo bytes and dimensions yields byte-identical output, which is what
//! makes re-uploads idempotent and golden-image tests possible.

use image::{
    codecs::{
        jpeg::JpegEncoder,
        png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    },
    imageops::FilterType,
    ColorType, DynamicImage, ImageBuffer, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage,
};

use crate::color::WHITE;
use crate::error::Result;

/// Below this edge length the logo is rendered edge-to-edge and sharpened;
/// at favicon sizes a padded logo degrades into an unreadable smudge.
const SHARPEN_MAX_SIZE: u32 = 32;

/// Margin reserved on each side of a maskable icon, as a fraction of the
/// edge, so OS mask shapes (circle, squircle) never clip logo content.
const MASKABLE_MARGIN_RATIO: f32 = 0.10;

/// Fraction of the available area the logo occupies on padded icons.
const LOGO_AREA_RATIO: f32 = 0.8;

/// Logo edge on a splash screen relative to the short canvas edge.
const SPLASH_LOGO_RATIO: f32 = 0.4;

const JPEG_QUALITY: u8 = 90;

/// Decode raw logo bytes (PNG/JPEG/WebP) into a shared source image.
pub fn decode_logo(bytes: &[u8]) -> Result<DynamicImage> {
    Ok(image::load_from_memory(bytes)?)
}

/// Produce one PNG icon of exactly `size x size`.
///
/// With a logo: contain-fit resize, centered on an opaque white canvas.
/// Maskable icons keep a 10% safe-zone margin on every side. Without a
/// logo: a flat square in the organization's fallback color.
pub fn synthesize_icon(
    logo: Option<&DynamicImage>,
    size: u32,
    maskable: bool,
    fallback: Rgba<u8>,
) -> Result<Vec<u8>> {
    let canvas = match logo {
        Some(logo) => compose_icon(logo, size, maskable),
        None => ImageBuffer::from_pixel(size, size, fallback),
    };
    encode_png(&canvas)
}

fn compose_icon(logo: &DynamicImage, size: u32, maskable: bool) -> RgbaImage {
    let mut canvas = ImageBuffer::from_pixel(size, size, WHITE);

    let resized = if size <= SHARPEN_MAX_SIZE {
        // Edge-to-edge at favicon sizes, with an unsharp pass to counter
        // Lanczos blur at this scale.
        logo.resize(size, size, FilterType::Lanczos3).unsharpen(0.8, 2)
    } else {
        let area = if maskable {
            size - 2 * margin(size)
        } else {
            size
        };
        let logo_edge = ((area as f32) * LOGO_AREA_RATIO).round() as u32;
        logo.resize(logo_edge, logo_edge, FilterType::Lanczos3)
    };

    let overlay = resized.to_rgba8();
    let x = (size - overlay.width()) / 2;
    let y = (size - overlay.height()) / 2;
    image::imageops::overlay(&mut canvas, &overlay, x.into(), y.into());

    canvas
}

/// Safe-zone margin in pixels for a maskable icon of the given edge.
pub fn margin(size: u32) -> u32 {
    ((size as f32) * MASKABLE_MARGIN_RATIO).round() as u32
}

/// Produce one JPEG splash screen of exactly `width x height`.
///
/// Canvas is flat-filled with the background color; if a logo is present it
/// is contain-fit to 40% of the short edge and centered. JPEG keeps the
/// payload small across the two dozen device variants.
pub fn synthesize_splash(
    logo: Option<&DynamicImage>,
    width: u32,
    height: u32,
    background: Rgba<u8>,
) -> Result<Vec<u8>> {
    let mut canvas = ImageBuffer::from_pixel(width, height, background);

    if let Some(logo) = logo {
        let logo_edge = ((width.min(height) as f32) * SPLASH_LOGO_RATIO).round() as u32;
        let resized = logo
            .resize(logo_edge, logo_edge, FilterType::Lanczos3)
            .to_rgba8();
        let x = (width - resized.width()) / 2;
        let y = (height - resized.height()) / 2;
        image::imageops::overlay(&mut canvas, &resized, x.into(), y.into());
    }

    encode_jpeg(&canvas)
}

// PNG settings are pinned (best compression, adaptive filtering) so the
// encoder never becomes a source of byte drift between runs.
fn encode_png(canvas: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buf, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(
        canvas.as_raw(),
        canvas.width(),
        canvas.height(),
        ColorType::Rgba8,
    )?;
    Ok(buf)
}

fn encode_jpeg(canvas: &RgbaImage) -> Result<Vec<u8>> {
    // Splash canvases are fully opaque, so dropping alpha is lossless and
    // cheaper than a DynamicImage round trip at poster dimensions.
    let mut rgb = RgbImage::new(canvas.width(), canvas.height());
    for (dst, src) in rgb.pixels_mut().zip(canvas.pixels()) {
        *dst = Rgb([src[0], src[1], src[2]]);
    }
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY);
    encoder.write_image(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)?;
    Ok(buf)
}
