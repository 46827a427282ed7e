//! Image preprocessing ahead of OCR: resize, bottom-strip crop, grayscale
//! and mean-threshold binarization. The MRZ sits along the card's bottom
//! edge, so most strategies feed the OCR engine only that strip.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageFormat};
use imageproc::contrast::threshold;

use crate::utils::ScanError;

/// Downscale when the larger dimension exceeds `max_dim`, preserving
/// aspect ratio. A zero limit disables resizing.
pub fn resize_if_needed(image: &DynamicImage, max_dim: u32) -> DynamicImage {
    let larger = image.width().max(image.height());
    if max_dim == 0 || larger <= max_dim {
        return image.clone();
    }
    image.resize(max_dim, max_dim, FilterType::Triangle)
}

/// Crop the bottom strip of the card. The strip is at least 10 pixels tall
/// so a degenerate fraction still yields something the OCR engine accepts.
pub fn crop_bottom_strip(image: &DynamicImage, fraction: f32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    let strip = ((height as f32 * fraction) as u32).max(10).min(height);
    let top = height - strip;
    image.crop_imm(0, top, width, strip)
}

pub fn grayscale(image: &DynamicImage) -> GrayImage {
    image.to_luma8()
}

/// Global-threshold binarization around the mean luminance. Simple, but
/// effective on the high-contrast OCR-B print of an MRZ strip.
pub fn binarize(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let cutoff = mean_luminance(&gray);
    threshold(&gray, cutoff)
}

fn mean_luminance(gray: &GrayImage) -> u8 {
    let pixels = gray.pixels().len();
    if pixels == 0 {
        return 128;
    }
    let sum: u64 = gray.pixels().map(|p| p.0[0] as u64).sum();
    (sum / pixels as u64) as u8
}

/// PNG-encode a processed frame for handoff to the OCR engine.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, ScanError> {
    let mut buffer = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
    Ok(buffer)
}
