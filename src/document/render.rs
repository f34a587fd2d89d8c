//! Plain-text PDF reconstruction
//!
//! The redacted text is laid out as fixed-size pages of Helvetica text. The
//! source layout is not preserved.

use crate::domain::{RedactError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// Page geometry and pagination
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Source lines per page
    pub lines_per_page: usize,
    /// Page width in points
    pub page_width: f32,
    /// Page height in points
    pub page_height: f32,
    /// Margin on every side in points
    pub margin: f32,
    /// Font size in points
    pub font_size: f32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lines_per_page: 50,
            page_width: 595.0,
            page_height: 842.0,
            margin: 50.0,
            font_size: 10.0,
        }
    }
}

impl RenderSettings {
    /// Settings with a custom page length
    pub fn with_lines_per_page(lines_per_page: usize) -> Self {
        Self {
            lines_per_page,
            ..Self::default()
        }
    }

    /// Rough Helvetica capacity of one row
    fn max_chars_per_row(&self) -> usize {
        let usable = (self.page_width - 2.0 * self.margin).max(self.font_size);
        ((usable / (self.font_size * 0.5)) as usize).max(1)
    }
}

/// Render `text` as a PDF with one page per `lines_per_page` lines
///
/// Lines longer than the text box wrap onto extra rows on the same page.
/// Characters outside Latin-1 are written as `?`.
///
/// # Errors
///
/// Returns [`RedactError::Configuration`] for zero `lines_per_page` and
/// [`RedactError::Other`] if the document cannot be serialized.
pub fn render_text_pdf(text: &str, settings: &RenderSettings) -> Result<Vec<u8>> {
    if settings.lines_per_page == 0 {
        return Err(RedactError::Configuration(
            "lines_per_page must be greater than 0".to_string(),
        ));
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let lines: Vec<&str> = text.split('\n').collect();
    let max_chars = settings.max_chars_per_row();
    let mut kids: Vec<Object> = Vec::new();

    for page_lines in lines.chunks(settings.lines_per_page) {
        let rows: Vec<Vec<u8>> = page_lines
            .iter()
            .flat_map(|line| wrap_line(line, max_chars))
            .collect();
        let content = page_content(&rows, settings);
        let encoded = content
            .encode()
            .map_err(|e| RedactError::Other(format!("Failed to encode page content: {e}")))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                settings.page_width.into(),
                settings.page_height.into(),
            ],
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| RedactError::Other(format!("Failed to write PDF: {e}")))?;

    tracing::debug!(pages = page_count, bytes = buffer.len(), "Rendered redacted PDF");
    Ok(buffer)
}

fn page_content(rows: &[Vec<u8>], settings: &RenderSettings) -> Content {
    let usable_height = settings.page_height - 2.0 * settings.margin;
    let leading = (settings.font_size * 1.2).min(usable_height / rows.len().max(1) as f32);
    let top = settings.page_height - settings.margin - settings.font_size;

    let mut operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), settings.font_size.into()]),
        Operation::new("TL", vec![leading.into()]),
        Operation::new("Td", vec![settings.margin.into(), top.into()]),
    ];
    for row in rows {
        operations.push(Operation::new(
            "Tj",
            vec![Object::String(row.clone(), StringFormat::Literal)],
        ));
        operations.push(Operation::new("T*", vec![]));
    }
    operations.push(Operation::new("ET", vec![]));

    Content { operations }
}

/// Latin-1 bytes of `line`, split into rows of at most `max_chars`
fn wrap_line(line: &str, max_chars: usize) -> Vec<Vec<u8>> {
    let encoded: Vec<u8> = line.chars().map(latin1_byte).collect();
    if encoded.is_empty() {
        return vec![Vec::new()];
    }
    encoded.chunks(max_chars).map(<[u8]>::to_vec).collect()
}

fn latin1_byte(c: char) -> u8 {
    match c {
        '\t' => b' ',
        '\r' => b' ',
        c if (c as u32) < 0x20 => b' ',
        c => u8::try_from(c as u32)
            .ok()
            .filter(|b| !(0x7f..0xa0).contains(b))
            .unwrap_or(b'?'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_count(pdf: &[u8]) -> usize {
        Document::load_mem(pdf).unwrap().get_pages().len()
    }

    #[test]
    fn test_one_page_per_fifty_lines() {
        let text = (0..120).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
        let pdf = render_text_pdf(&text, &RenderSettings::default()).unwrap();
        assert_eq!(page_count(&pdf), 3);
    }

    #[test]
    fn test_empty_text_renders_single_page() {
        let pdf = render_text_pdf("", &RenderSettings::default()).unwrap();
        assert_eq!(page_count(&pdf), 1);
    }

    #[test]
    fn test_custom_lines_per_page() {
        let pdf = render_text_pdf("a\nb\nc", &RenderSettings::with_lines_per_page(1)).unwrap();
        assert_eq!(page_count(&pdf), 3);
    }

    #[test]
    fn test_zero_lines_per_page_rejected() {
        let result = render_text_pdf("a", &RenderSettings::with_lines_per_page(0));
        assert!(matches!(result, Err(RedactError::Configuration(_))));
    }

    #[test]
    fn test_text_round_trips_through_lopdf() {
        let pdf = render_text_pdf("Contact [REDACTED] today", &RenderSettings::default()).unwrap();
        let doc = Document::load_mem(&pdf).unwrap();
        let text = doc.extract_text(&[1]).unwrap();
        assert!(text.contains("[REDACTED]"));
    }

    #[test]
    fn test_latin1_mapping() {
        assert_eq!(latin1_byte('A'), b'A');
        assert_eq!(latin1_byte('é'), 0xe9);
        assert_eq!(latin1_byte('€'), b'?');
        assert_eq!(latin1_byte('漢'), b'?');
        assert_eq!(latin1_byte('\t'), b' ');
    }

    #[test]
    fn test_long_line_wraps() {
        let rows = wrap_line(&"x".repeat(250), 100);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].len(), 50);
        assert_eq!(wrap_line("", 100), vec![Vec::<u8>::new()]);
    }
}
