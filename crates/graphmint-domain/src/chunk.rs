//! Chunk module - a bounded slice of document text

use serde::{Deserialize, Serialize};

/// A slice of document text produced by the splitter
///
/// Chunks form an ordered sequence. Each chunk may repeat the tail of
/// its predecessor so that entities straddling a cut are still seen in
/// one piece by the extraction model; `overlap` records how many bytes
/// of the chunk's text are that repeated prefix (0 for the first
/// chunk). Concatenating `text[overlap..]` across the sequence yields
/// the original document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Position of this chunk in the sequence (0-based)
    pub index: usize,

    /// The chunk text, including any overlapped prefix
    pub text: String,

    /// Byte offset of `text` within the source document
    pub start_offset: usize,

    /// Number of leading bytes duplicated from the previous chunk
    pub overlap: usize,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(index: usize, text: String, start_offset: usize, overlap: usize) -> Self {
        debug_assert!(overlap <= text.len(), "overlap cannot exceed chunk text");
        Self {
            index,
            text,
            start_offset,
            overlap,
        }
    }

    /// The portion of this chunk not repeated from its predecessor
    pub fn fresh_text(&self) -> &str {
        &self.text[self.overlap..]
    }

    /// Byte length of the chunk text
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the chunk text is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
