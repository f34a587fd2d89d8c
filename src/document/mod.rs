//! Document text extraction and reconstruction
//!
//! PDF input is reduced to a single text (page text layer plus OCR text of
//! embedded images) before detection; the redacted text is rendered back into
//! a plain PDF.

pub mod extractor;
pub mod ocr;
pub mod preprocess;
pub mod render;

pub use extractor::{DocumentTextExtractor, ExtractedDocument, LopdfExtractor, OcrFragment};
pub use ocr::{EmbeddedImage, ImageEncoding, ImageOcr, NoOcr, TesseractOcr};
pub use render::{render_text_pdf, RenderSettings};
