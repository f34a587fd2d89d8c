//! OCR for images embedded in PDFs
//!
//! The pipeline only needs text back or an error it can skip.

use super::preprocess::{decode_embedded, encode_png, prepare_for_ocr};
use crate::domain::ExtractionError;
use std::borrow::Cow;
use std::io::Write;
use std::process::Command;

/// How an embedded image's bytes are encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageEncoding {
    /// Baseline JPEG stream (`DCTDecode`)
    Jpeg,
    /// JPEG 2000 stream (`JPXDecode`)
    Jpeg2000,
    /// Uncompressed samples, row-major, `channels` per pixel, rows padded
    /// to whole bytes
    Raw { channels: u8, bits_per_component: u8 },
}

/// Image handed to an OCR engine
#[derive(Debug, Clone)]
pub struct EmbeddedImage<'a> {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Encoding of `data`
    pub encoding: ImageEncoding,
    /// Encoded bytes
    pub data: &'a [u8],
}

/// Text recognition over a single image
pub trait ImageOcr: Send + Sync {
    /// Recognize text in `image`
    ///
    /// # Errors
    ///
    /// Per-image [`ExtractionError`] variants only; callers skip the image.
    fn recognize(&self, image: &EmbeddedImage<'_>) -> Result<String, ExtractionError>;

    /// Engine name for logs
    fn name(&self) -> &str;

    /// Whether images should be collected at all
    fn is_enabled(&self) -> bool {
        true
    }
}

/// OCR disabled: images are never inspected
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl ImageOcr for NoOcr {
    fn recognize(&self, _image: &EmbeddedImage<'_>) -> Result<String, ExtractionError> {
        Ok(String::new())
    }

    fn name(&self) -> &str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Runs the `tesseract` executable on a temporary image file
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    command: String,
}

impl TesseractOcr {
    /// Page segmentation mode: single uniform block of text
    pub const PSM: &'static str = "6";
    /// OCR engine mode: default available engine
    pub const OEM: &'static str = "3";

    /// Create an engine invoking `command`
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// File suffix and bytes tesseract can read for `image`
    ///
    /// Decodable images are binarized and written as PNG; JPEG 2000 streams
    /// are handed over untouched.
    fn encode<'a>(image: &EmbeddedImage<'a>) -> Result<(&'static str, Cow<'a, [u8]>), ExtractionError> {
        if image.encoding == ImageEncoding::Jpeg2000 {
            return Ok((".jp2", Cow::Borrowed(image.data)));
        }
        let binary = prepare_for_ocr(&decode_embedded(image)?);
        Ok((".png", Cow::Owned(encode_png(&binary)?)))
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl ImageOcr for TesseractOcr {
    fn recognize(&self, image: &EmbeddedImage<'_>) -> Result<String, ExtractionError> {
        let (suffix, bytes) = Self::encode(image)?;

        let mut file = tempfile::Builder::new()
            .prefix("pii-redact-ocr-")
            .suffix(suffix)
            .tempfile()
            .map_err(|e| ExtractionError::Ocr(format!("Failed to create temp image: {e}")))?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .map_err(|e| ExtractionError::Ocr(format!("Failed to write temp image: {e}")))?;

        let output = Command::new(&self.command)
            .arg(file.path())
            .arg("stdout")
            .args(["--psm", Self::PSM, "--oem", Self::OEM])
            .output()
            .map_err(|e| ExtractionError::Ocr(format!("Failed to run {}: {e}", self.command)))?;

        if !output.status.success() {
            return Err(ExtractionError::Ocr(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn name(&self) -> &str {
        &self.command
    }
}
