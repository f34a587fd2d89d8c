//! Char/byte offset mapping
//!
//! Spans address text by char offset while Rust strings slice by byte offset.
//! [`CharIndex`] builds the mapping once per document.

/// Char offset to byte offset lookup for one text
#[derive(Debug, Clone)]
pub struct CharIndex {
    /// `bytes[i]` is the byte offset of char `i`; the last entry is `text.len()`
    bytes: Vec<usize>,
}

impl CharIndex {
    /// Build the index for `text`
    pub fn new(text: &str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        bytes.push(text.len());
        Self { bytes }
    }

    /// Number of chars in the indexed text
    pub fn char_len(&self) -> usize {
        self.bytes.len() - 1
    }

    /// Byte offset of a char offset, `None` past the end
    pub fn byte_offset(&self, char_offset: usize) -> Option<usize> {
        self.bytes.get(char_offset).copied()
    }

    /// Char offset of a byte offset that lies on a char boundary
    pub fn char_offset(&self, byte_offset: usize) -> Option<usize> {
        self.bytes.binary_search(&byte_offset).ok()
    }

    /// Slice `text` by char range
    pub fn slice<'a>(&self, text: &'a str, start: usize, end: usize) -> Option<&'a str> {
        let b_start = self.byte_offset(start)?;
        let b_end = self.byte_offset(end)?;
        text.get(b_start..b_end)
    }
}
