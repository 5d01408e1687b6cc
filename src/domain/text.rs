//! Positioned page text.
//!
//! A [`TextRun`] is one line of page text together with the box of every
//! character in it, so a match found on the string maps straight back to
//! the glyphs it came from.

use super::Region;
use std::ops::Range;

/// One line of text with a box per character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    text: String,
    /// Byte offset into `text` and box of each character, in order.
    glyphs: Vec<(usize, Region)>,
}

impl TextRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a character and its box.
    pub fn push(&mut self, ch: char, bbox: Region) {
        self.glyphs.push((self.text.len(), bbox));
        self.text.push(ch);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Bounding box of the characters covered by the byte range `span`.
    ///
    /// Returns `None` for an empty range or one that covers no character.
    pub fn span(&self, span: Range<usize>) -> Option<Region> {
        self.glyphs
            .iter()
            .filter(|(offset, _)| span.contains(offset))
            .map(|(_, bbox)| *bbox)
            .reduce(|acc, bbox| acc.union(&bbox))
    }
}
