//! Fixed-size text splitting with overlap

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use graphmint_domain::Chunk;

/// Splits document text into fixed-size chunks with controlled overlap
///
/// Each chunk repeats the tail of its predecessor (`overlap` bytes) so
/// entities straddling a cut are seen whole by at least one extraction
/// call. In approximate mode, cuts are pulled back to the nearest
/// whitespace so words are not split; cuts always land on UTF-8 char
/// boundaries either way.
///
/// Invariant: concatenating each chunk's text minus its recorded
/// overlap reconstructs the input exactly, and the same input and
/// settings always produce the same chunk sequence.
pub struct TextSplitter {
    chunk_size: usize,
    overlap: usize,
    approximate: bool,
}

impl TextSplitter {
    /// Create a new splitter
    ///
    /// Fails with `InvalidConfiguration` when `chunk_size` is zero or
    /// `overlap` is not smaller than `chunk_size`.
    pub fn new(chunk_size: usize, overlap: usize, approximate: bool) -> Result<Self, ExtractorError> {
        if chunk_size == 0 {
            return Err(ExtractorError::InvalidConfiguration(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ExtractorError::InvalidConfiguration(format!(
                "overlap {} must be smaller than chunk_size {}",
                overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
            approximate,
        })
    }

    /// Create a splitter from pipeline configuration
    pub fn from_config(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::new(config.chunk_size, config.chunk_overlap, config.approximate)
    }

    /// Split `text` into an ordered chunk sequence
    ///
    /// Empty input produces an empty sequence, not an error.
    pub fn split(&self, text: &str) -> Vec<Chunk> {
        let len = text.len();
        if len == 0 {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0usize;
        let mut overlap_len = 0usize;
        let mut index = 0usize;

        loop {
            let mut end = floor_char_boundary(text, (start + self.chunk_size).min(len));
            if end <= start {
                // chunk_size smaller than one character at this position
                end = ceil_char_boundary(text, start + 1);
            }

            if self.approximate && end < len {
                // Only accept a whitespace cut that leaves fresh content
                // beyond both the overlapped prefix and the configured
                // overlap, so the next window still advances.
                let search_floor =
                    ceil_char_boundary(text, start + overlap_len.max(self.overlap));
                if search_floor < end {
                    if let Some(cut) = whitespace_cut(text, search_floor, end) {
                        end = cut;
                    }
                }
            }

            chunks.push(Chunk::new(
                index,
                text[start..end].to_string(),
                start,
                overlap_len,
            ));

            if end >= len {
                break;
            }

            // Snap up, not down: the realized overlap must never
            // exceed the configured one, or a later window could fail
            // to advance past its own overlapped prefix.
            let mut next_start = ceil_char_boundary(text, end.saturating_sub(self.overlap));
            if next_start <= start {
                // The overlap would swallow the entire previous chunk;
                // drop it for this boundary rather than stall.
                next_start = end;
            }
            overlap_len = end - next_start;
            start = next_start;
            index += 1;
        }

        chunks
    }
}

/// Largest char boundary at or below `i`
fn floor_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary at or above `i`
fn ceil_char_boundary(text: &str, mut i: usize) -> usize {
    if i >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// Cut point just after the last whitespace char in `text[floor..end]`
fn whitespace_cut(text: &str, floor: usize, end: usize) -> Option<usize> {
    text[floor..end]
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| floor + i + c.len_utf8())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.fresh_text()).collect()
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let splitter = TextSplitter::new(100, 10, false).unwrap();
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn test_small_input_yields_single_chunk() {
        let splitter = TextSplitter::new(100, 10, false).unwrap();
        let chunks = splitter.split("short text");
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short text");
        assert_eq!(chunks[0].index, 0);
        assert_eq!(chunks[0].overlap, 0);
        assert_eq!(chunks[0].start_offset, 0);
    }

    #[test]
    fn test_exact_cuts_have_fixed_size() {
        let splitter = TextSplitter::new(10, 3, false).unwrap();
        let text = "abcdefghijklmnopqrstuvwxyz";
        let chunks = splitter.split(text);

        assert!(chunks.len() > 1);
        assert_eq!(chunks[0].text, "abcdefghij");
        // Next chunk starts 3 back from the previous cut
        assert_eq!(chunks[1].start_offset, 7);
        assert_eq!(chunks[1].overlap, 3);
        assert!(chunks[1].text.starts_with("hij"));
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        assert!(TextSplitter::new(0, 0, false).is_err());
        assert!(TextSplitter::new(10, 10, false).is_err());
        assert!(TextSplitter::new(10, 20, true).is_err());
        assert!(TextSplitter::new(10, 9, true).is_ok());
    }

    #[test]
    fn test_approximate_cuts_avoid_splitting_words() {
        let splitter = TextSplitter::new(12, 4, true).unwrap();
        let text = "alpha beta gamma delta epsilon";
        let chunks = splitter.split(text);

        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(
                chunk.text.ends_with(char::is_whitespace),
                "interior chunk should cut after whitespace: {:?}",
                chunk.text
            );
        }
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_approximate_falls_back_to_exact_cut() {
        // No whitespace anywhere, so cuts stay exact
        let splitter = TextSplitter::new(8, 2, true).unwrap();
        let text = "a".repeat(30);
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_multibyte_text_never_splits_chars() {
        let splitter = TextSplitter::new(7, 2, false).unwrap();
        let text = "καλημέρα κόσμε, знание сила";
        let chunks = splitter.split(text);

        for chunk in &chunks {
            // Slicing would have panicked already if a cut landed
            // mid-char; check offsets line up too.
            assert_eq!(
                &text[chunk.start_offset..chunk.start_offset + chunk.text.len()],
                chunk.text
            );
        }
        assert_eq!(reconstruct(&chunks), text);
    }

    #[test]
    fn test_deterministic() {
        let splitter = TextSplitter::new(16, 5, true).unwrap();
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(8);
        assert_eq!(splitter.split(&text), splitter.split(&text));
    }

    #[test]
    fn test_reconstruction_across_config_grid() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. \
                    Sed do eiusmod tempor incididunt ut labore et dolore magna aliqua. "
            .repeat(4);

        for approximate in [false, true] {
            for chunk_size in [5, 16, 37, 64, 200] {
                for overlap in [0, 1, 3, chunk_size / 2, chunk_size - 1] {
                    let splitter = TextSplitter::new(chunk_size, overlap, approximate).unwrap();
                    let chunks = splitter.split(&text);
                    assert_eq!(
                        reconstruct(&chunks),
                        text,
                        "lossy split at size={} overlap={} approx={}",
                        chunk_size,
                        overlap,
                        approximate
                    );
                    for (i, chunk) in chunks.iter().enumerate() {
                        assert_eq!(chunk.index, i);
                    }
                }
            }
        }
    }
}
