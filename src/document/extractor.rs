//! PDF text layer and embedded image extraction

use super::ocr::{EmbeddedImage, ImageEncoding, ImageOcr};
use crate::domain::ExtractionError;
use lopdf::{Document, ObjectId};
use std::fmt::Write as _;
use std::sync::Arc;

/// Text recovered from one embedded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrFragment {
    /// 1-based page number
    pub page: usize,
    /// 1-based position among the page's images
    pub index: usize,
    /// Recognized text
    pub text: String,
}

/// Text content of a PDF
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedDocument {
    /// Text layer, one entry per page in page order
    pub pages: Vec<String>,
    /// OCR output for embedded images, in page then image order
    pub ocr: Vec<OcrFragment>,
}

impl ExtractedDocument {
    /// Single text fed to detection
    ///
    /// Each page followed by a newline, one separating newline, then one
    /// `[Image <page>-<index>]: <text>` line per non-empty OCR fragment.
    pub fn combined_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            out.push_str(page);
            out.push('\n');
        }
        out.push('\n');
        for fragment in &self.ocr {
            let text = fragment.text.trim();
            if text.is_empty() {
                continue;
            }
            let _ = writeln!(out, "[Image {}-{}]: {}", fragment.page, fragment.index, text);
        }
        out
    }
}

/// Extracts text from PDF bytes
pub trait DocumentTextExtractor: Send + Sync {
    /// Extract the text layer and OCR text of a document
    ///
    /// # Errors
    ///
    /// Only document-level failures are returned; a failing image is skipped.
    fn extract(&self, pdf_bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError>;
}

/// lopdf-backed extractor
pub struct LopdfExtractor {
    ocr: Arc<dyn ImageOcr>,
}

impl LopdfExtractor {
    /// Create an extractor handing embedded images to `ocr`
    pub fn new(ocr: Arc<dyn ImageOcr>) -> Self {
        Self { ocr }
    }

    fn page_images(
        &self,
        doc: &Document,
        page_num: u32,
        page_id: ObjectId,
    ) -> Vec<OcrFragment> {
        let images = match doc.get_page_images(page_id) {
            Ok(images) => images,
            Err(e) => {
                tracing::warn!(page = page_num, error = %e, "Failed to list page images");
                return Vec::new();
            }
        };

        let mut fragments = Vec::new();
        for (idx, image) in images.iter().enumerate() {
            let filters = image.filters.clone().unwrap_or_default();
            let classified = classify(
                doc,
                image.id,
                &filters,
                image.color_space.as_deref(),
                image.bits_per_component,
            );
            let (encoding, data) = match classified {
                Ok(pair) => pair,
                Err(e) => {
                    tracing::warn!(page = page_num, image = idx + 1, error = %e, "Skipping image");
                    continue;
                }
            };

            let embedded = EmbeddedImage {
                width: image.width.max(0) as u32,
                height: image.height.max(0) as u32,
                encoding,
                data: data.as_deref().unwrap_or(image.content),
            };

            match self.ocr.recognize(&embedded) {
                Ok(text) if !text.trim().is_empty() => fragments.push(OcrFragment {
                    page: page_num as usize,
                    index: idx + 1,
                    text,
                }),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        page = page_num,
                        image = idx + 1,
                        ocr = self.ocr.name(),
                        error = %e,
                        "OCR failed for image, skipping"
                    );
                }
            }
        }
        fragments
    }
}

/// Decide how an image stream is handed to OCR
///
/// Returns decoded sample data for raw or Flate-compressed gray/RGB images;
/// `None` means the raw stream content is passed through.
fn classify(
    doc: &Document,
    id: ObjectId,
    filters: &[String],
    color_space: Option<&str>,
    bits_per_component: Option<i64>,
) -> Result<(ImageEncoding, Option<Vec<u8>>), ExtractionError> {
    match filters {
        [f] if f == "DCTDecode" => Ok((ImageEncoding::Jpeg, None)),
        [f] if f == "JPXDecode" => Ok((ImageEncoding::Jpeg2000, None)),
        [] | [_] if filters.iter().all(|f| f == "FlateDecode") => {
            let channels = match color_space {
                Some("DeviceGray" | "CalGray") => 1,
                Some("DeviceRGB" | "CalRGB") => 3,
                other => {
                    return Err(ExtractionError::UnsupportedImage(format!(
                        "raw image with color space {}",
                        other.unwrap_or("unknown")
                    )))
                }
            };
            let bits_per_component = match bits_per_component {
                Some(bits @ (1 | 2 | 4 | 8 | 16)) => bits as u8,
                other => {
                    return Err(ExtractionError::UnsupportedImage(format!(
                        "raw image with {} bits per component",
                        other.map(|b| b.to_string()).unwrap_or_else(|| "unknown".to_string())
                    )))
                }
            };
            let stream = doc
                .get_object(id)
                .and_then(|o| o.as_stream())
                .map_err(|e| ExtractionError::ImageDecode(e.to_string()))?;
            let samples = if filters.is_empty() {
                stream.content.clone()
            } else {
                stream
                    .decompressed_content()
                    .map_err(|e| ExtractionError::ImageDecode(e.to_string()))?
            };
            Ok((
                ImageEncoding::Raw {
                    channels,
                    bits_per_component,
                },
                Some(samples),
            ))
        }
        other => Err(ExtractionError::UnsupportedImage(format!(
            "filter chain [{}]",
            other.join(", ")
        ))),
    }
}

impl DocumentTextExtractor for LopdfExtractor {
    fn extract(&self, pdf_bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

        let mut extracted = ExtractedDocument::default();
        for (page_num, page_id) in doc.get_pages() {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(page = page_num, error = %e, "Failed to extract page text layer");
                    String::new()
                }
            };
            extracted.pages.push(text);

            if self.ocr.is_enabled() {
                extracted
                    .ocr
                    .extend(self.page_images(&doc, page_num, page_id));
            }
        }

        tracing::debug!(
            pages = extracted.pages.len(),
            ocr_fragments = extracted.ocr.len(),
            "PDF text extracted"
        );

        Ok(extracted)
    }
}
