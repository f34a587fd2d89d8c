//! Image decoding and binarization ahead of OCR
//!
//! Every decodable embedded image goes through the same steps before
//! recognition: grayscale, 5x5 Gaussian blur, contrast doubled, then an
//! inverted adaptive Gaussian threshold over 21x21 neighbourhoods.

use super::ocr::{EmbeddedImage, ImageEncoding};
use crate::domain::ExtractionError;
use image::{imageops, DynamicImage, GrayImage, ImageOutputFormat, Luma, RgbImage};
use std::io::Cursor;

/// Sigma matching a 5x5 Gaussian kernel
const BLUR_SIGMA: f32 = 1.1;

/// Linear contrast gain, saturating at 255
const CONTRAST_GAIN: f32 = 2.0;

/// Sigma matching a 21x21 Gaussian neighbourhood
const THRESHOLD_SIGMA: f32 = 3.5;

/// Subtracted from the neighbourhood mean before comparison
const THRESHOLD_OFFSET: i16 = 5;

/// Decode an embedded image into pixels
///
/// # Errors
///
/// [`ExtractionError::ImageDecode`] for truncated or undecodable data and
/// [`ExtractionError::UnsupportedImage`] for layouts other than gray or RGB
/// at 1, 2, 4, 8 or 16 bits per component.
pub fn decode_embedded(image: &EmbeddedImage<'_>) -> Result<DynamicImage, ExtractionError> {
    match image.encoding {
        ImageEncoding::Jpeg => image::load_from_memory(image.data)
            .map_err(|e| ExtractionError::ImageDecode(format!("JPEG: {e}"))),
        ImageEncoding::Jpeg2000 => Err(ExtractionError::UnsupportedImage(
            "JPEG 2000 cannot be decoded to pixels".to_string(),
        )),
        ImageEncoding::Raw {
            channels,
            bits_per_component,
        } => {
            let samples = unpack_samples(
                image.data,
                image.width,
                image.height,
                channels,
                bits_per_component,
            )?;
            let decoded = match channels {
                1 => GrayImage::from_raw(image.width, image.height, samples)
                    .map(DynamicImage::ImageLuma8),
                3 => RgbImage::from_raw(image.width, image.height, samples)
                    .map(DynamicImage::ImageRgb8),
                n => {
                    return Err(ExtractionError::UnsupportedImage(format!(
                        "{n} channel raw image"
                    )))
                }
            };
            decoded.ok_or_else(|| {
                ExtractionError::ImageDecode(format!(
                    "{}x{} buffer does not match its dimensions",
                    image.width, image.height
                ))
            })
        }
    }
}

/// Expand packed samples to one byte per sample
///
/// Rows start on byte boundaries. Low bit depths are scaled to the full
/// 0..=255 range; 16-bit samples keep their high byte.
fn unpack_samples(
    data: &[u8],
    width: u32,
    height: u32,
    channels: u8,
    bits: u8,
) -> Result<Vec<u8>, ExtractionError> {
    if !matches!(bits, 1 | 2 | 4 | 8 | 16) {
        return Err(ExtractionError::UnsupportedImage(format!(
            "{bits} bits per component"
        )));
    }

    let per_row = width as usize * channels as usize;
    let row_bytes = (per_row * bits as usize + 7) / 8;
    let expected = row_bytes * height as usize;
    if width == 0 || height == 0 || data.len() < expected {
        return Err(ExtractionError::ImageDecode(format!(
            "expected {expected} bytes for {width}x{height} image, got {}",
            data.len()
        )));
    }

    let mut out = Vec::with_capacity(per_row * height as usize);
    for row in data[..expected].chunks_exact(row_bytes) {
        match bits {
            8 => out.extend_from_slice(&row[..per_row]),
            16 => out.extend(row.chunks_exact(2).take(per_row).map(|pair| pair[0])),
            _ => {
                let max = (1u16 << bits) - 1;
                let mask = max as u8;
                let per_byte = 8 / bits as usize;
                for i in 0..per_row {
                    let byte = row[i / per_byte];
                    let shift = 8 - bits as usize * (i % per_byte + 1);
                    let value = (byte >> shift) & mask;
                    out.push((u16::from(value) * 255 / max) as u8);
                }
            }
        }
    }
    Ok(out)
}

/// Binarize an image for recognition
///
/// Text darker than its surroundings comes out white on black.
pub fn prepare_for_ocr(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let mut boosted = imageops::blur(&gray, BLUR_SIGMA);
    for pixel in boosted.pixels_mut() {
        let value = f32::from(pixel.0[0]) * CONTRAST_GAIN;
        pixel.0[0] = value.round().min(255.0) as u8;
    }
    adaptive_threshold_inverted(&boosted)
}

fn adaptive_threshold_inverted(image: &GrayImage) -> GrayImage {
    let local_mean = imageops::blur(image, THRESHOLD_SIGMA);
    let mut out = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let threshold = i16::from(local_mean.get_pixel(x, y).0[0]) - THRESHOLD_OFFSET;
        let value = if i16::from(pixel.0[0]) > threshold { 0 } else { 255 };
        out.put_pixel(x, y, Luma([value]));
    }
    out
}

/// PNG bytes of a grayscale image
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>, ExtractionError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(image.clone())
        .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| ExtractionError::ImageDecode(format!("PNG encoding failed: {e}")))?;
    Ok(bytes)
}
