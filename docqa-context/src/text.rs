//! Recursive separator-based text splitting with overlap.
//!
//! The splitter breaks text into chunks no longer than a configured
//! `chunk_size`, trying the coarsest separator first (paragraph break) and
//! recursing through finer ones (line break, space, character boundary) only
//! for segments that are still too large. Adjacent chunks then share an
//! overlap: each chunk after the first begins with the trailing
//! `chunk_overlap` characters of its predecessor, moved forward to the nearest
//! word boundary when one exists inside the overlap window, so a chunk never
//! starts mid-word unless the window contains no whitespace at all.
//!
//! The overlap preserves semantic continuity across chunk boundaries for
//! retrieval: a sentence cut by a boundary is still fully present in one of
//! the two chunks.

use docqa_extract::DocumentUnit;
use regex::Regex;
use serde::Serialize;
use std::ops::Range;

/// Default maximum chunk length in bytes of UTF-8 text.
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

/// Default overlap carried from one chunk into the next.
pub const DEFAULT_CHUNK_OVERLAP: usize = 200;

/// Separator patterns in priority order: paragraph break, line break, space.
/// Segments that none of these can reduce below the size bound are split at
/// character boundaries.
pub const DEFAULT_SEPARATORS: &[&str] = &[r"\n\n", r"\n", r" "];

/// Provenance carried on every chunk, inherited from the source unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkMetadata {
    /// Path of the source file.
    pub source: String,
    /// Page/section index of the unit this chunk came from.
    pub unit_index: usize,
    /// Sequential chunk index within that unit (0-based).
    pub chunk_index: usize,
    /// Source format label.
    pub format: &'static str,
}

/// A bounded span of source text, sized for embedding.
///
/// Chunks are immutable once created; they are embedded and persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Splits text into overlapping chunks.
///
/// # Precondition
///
/// `chunk_overlap` must be strictly less than `chunk_size`. Violating this is
/// a caller error; it is not checked at runtime.
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<Regex>,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_OVERLAP)
    }
}

impl TextSplitter {
    /// Create a splitter with the default separator priorities.
    ///
    /// # Panics
    ///
    /// Panics if a default separator pattern fails to compile, which cannot
    /// happen for the built-in set.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let separators = DEFAULT_SEPARATORS
            .iter()
            .map(|&pattern| Regex::new(pattern).unwrap())
            .collect();
        Self {
            chunk_size,
            chunk_overlap,
            separators,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Split `text` into chunks of at most `chunk_size` characters, each chunk
    /// after the first prefixed with up to `chunk_overlap` trailing characters
    /// of its predecessor. Empty input yields no chunks; input no longer than
    /// `chunk_size` yields exactly one chunk with no overlap.
    pub fn split(&self, text: &str) -> Vec<String> {
        let segments = self.split_recursively_into_segments(text, 0, 0);

        let mut chunks: Vec<Range<usize>> = Vec::new();
        let mut start: Option<usize> = None;
        let mut end = 0;

        for segment in segments {
            match start {
                None => {
                    start = Some(segment.start);
                    end = segment.end;
                }
                Some(s) => {
                    if segment.end - s > self.chunk_size {
                        chunks.push(s..end);
                        // The next chunk opens with the previous chunk's tail,
                        // shrunk if needed so the incoming segment still fits.
                        let lower = end
                            .saturating_sub(self.chunk_overlap)
                            .max(segment.end.saturating_sub(self.chunk_size));
                        start = Some(overlap_start(text, lower, end));
                    }
                    end = segment.end;
                }
            }
        }

        if let Some(s) = start {
            if end > s {
                chunks.push(s..end);
            }
        }

        chunks
            .into_iter()
            .map(|range| text[range].to_string())
            .collect()
    }

    /// Split every unit and carry its metadata onto the resulting chunks.
    /// Chunk indexes restart at 0 for each unit.
    pub fn chunk_units(&self, units: &[DocumentUnit]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for unit in units {
            for (chunk_index, content) in self.split(&unit.content).into_iter().enumerate() {
                chunks.push(Chunk {
                    content,
                    metadata: ChunkMetadata {
                        source: unit.metadata.source.clone(),
                        unit_index: unit.metadata.index,
                        chunk_index,
                        format: unit.metadata.format,
                    },
                });
            }
        }
        chunks
    }

    // Recursively splits the text into byte ranges no longer than chunk_size.
    // Each separator match is attached to the text preceding it, so segment
    // starts always fall on separator boundaries. When every separator is
    // exhausted the remaining text splits at character boundaries.
    fn split_recursively_into_segments(
        &self,
        text: &str,
        separator_idx: usize,
        offset: usize,
    ) -> Vec<Range<usize>> {
        let mut segments: Vec<Range<usize>> = Vec::new();

        if text.is_empty() {
            return segments;
        }

        if text.len() <= self.chunk_size {
            segments.push(offset..offset + text.len());
            return segments;
        }

        if separator_idx >= self.separators.len() {
            for (i, ch) in text.char_indices() {
                segments.push(offset + i..offset + i + ch.len_utf8());
            }
            return segments;
        }

        let separator = &self.separators[separator_idx];
        let mut piece_start = 0;

        for m in separator.find_iter(text) {
            // Piece plus its trailing separator.
            let piece = &text[piece_start..m.end()];
            if !piece.is_empty() {
                if piece.len() <= self.chunk_size {
                    segments.push(offset + piece_start..offset + m.end());
                } else {
                    segments.extend(self.split_recursively_into_segments(
                        piece,
                        separator_idx + 1,
                        offset + piece_start,
                    ));
                }
            }
            piece_start = m.end();
        }

        if piece_start < text.len() {
            let tail = &text[piece_start..];
            if tail.len() <= self.chunk_size {
                segments.push(offset + piece_start..offset + text.len());
            } else {
                segments.extend(self.split_recursively_into_segments(
                    tail,
                    separator_idx + 1,
                    offset + piece_start,
                ));
            }
        }

        segments
    }
}

/// Pick where the next chunk's overlap prefix begins inside `[lower, end)`.
///
/// Prefers the first word boundary at or after `lower`; falls back to `lower`
/// itself (possibly mid-word) when the window contains no whitespace.
fn overlap_start(text: &str, lower: usize, end: usize) -> usize {
    if lower >= end {
        return end;
    }
    let lower = ceil_char_boundary(text, lower);
    if lower >= end {
        return end;
    }

    // Already on a word boundary: either the start of the text or preceded by
    // whitespace.
    let at_boundary = text[..lower]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace());
    if at_boundary {
        return lower;
    }

    match text[lower..end].find(|c: char| c.is_whitespace()) {
        Some(pos) => {
            let ws_start = lower + pos;
            let ws_len = text[ws_start..].chars().next().map_or(1, char::len_utf8);
            (ws_start + ws_len).min(end)
        }
        None => lower,
    }
}

fn ceil_char_boundary(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index.min(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_extract::SourceFormat;
    use std::path::Path;

    /// Longest suffix of `a` that is also a prefix of `b`.
    fn shared_overlap(a: &str, b: &str) -> usize {
        let max = a.len().min(b.len());
        (1..=max)
            .rev()
            .find(|&len| {
                a.is_char_boundary(a.len() - len)
                    && b.is_char_boundary(len)
                    && a[a.len() - len..] == b[..len]
            })
            .unwrap_or(0)
    }

    #[test]
    fn short_input_yields_single_chunk_without_overlap() {
        let splitter = TextSplitter::new(500, 100);
        let chunks = splitter.split("This is a very short document.");
        assert_eq!(chunks, vec!["This is a very short document.".to_string()]);
    }

    #[test]
    fn empty_input_yields_no_chunks() {
        let splitter = TextSplitter::default();
        assert!(splitter.split("").is_empty());
    }

    #[test]
    fn every_chunk_respects_the_size_bound() {
        let splitter = TextSplitter::new(500, 100);
        let text = (0..100).map(|_| "This is a test sentence. ").collect::<String>();
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.len() <= 500, "chunk too long: {}", chunk.len());
        }
    }

    #[test]
    fn adjacent_chunks_share_a_bounded_nonempty_overlap() {
        let splitter = TextSplitter::new(500, 100);
        // Numbered sentences keep the text aperiodic, so the longest shared
        // suffix/prefix is exactly the overlap the splitter produced.
        let text = (0..60)
            .map(|i| format!("Sentence number {i} talks about retrieval. "))
            .collect::<String>();
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let overlap = shared_overlap(&pair[0], &pair[1]);
            assert!(overlap > 0, "expected a nonempty overlap");
            assert!(overlap <= 100, "overlap too long: {overlap}");
        }
    }

    #[test]
    fn overlap_never_starts_mid_word_when_spaces_are_available() {
        let splitter = TextSplitter::new(300, 80);
        let text = (0..40)
            .map(|i| format!("pipeline stage {i} needs surrounding context "))
            .collect::<String>();
        let chunks = splitter.split(&text);
        assert!(chunks.len() > 1);

        for pair in chunks.windows(2) {
            let overlap = shared_overlap(&pair[0], &pair[1]);
            assert!(overlap > 0);
            // The character preceding the shared region must be whitespace,
            // i.e. the next chunk opens on a word boundary.
            let before = pair[0][..pair[0].len() - overlap].chars().next_back();
            assert!(
                before.is_none_or(|c| c.is_whitespace()),
                "chunk starts mid-word: ...{:?} | {:?}...",
                before,
                &pair[1][..20.min(pair[1].len())]
            );
        }
    }

    #[test]
    fn unbroken_text_splits_at_exact_character_windows() {
        // No separators at all: 2500 chars with S=1000, O=200 must give
        // exactly three chunks of 1000/1000/900 with exact 200-char overlaps.
        let splitter = TextSplitter::new(1000, 200);
        let text: String = (0..2500u32)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let chunks = splitter.split(&text);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 1000);
        assert_eq!(chunks[2].len(), 900);
        assert_eq!(chunks[0], text[0..1000]);
        assert_eq!(chunks[1], text[800..1800]);
        assert_eq!(chunks[2], text[1600..2500]);
        // 200-character overlap between each adjacent pair.
        assert_eq!(chunks[0][800..], chunks[1][..200]);
        assert_eq!(chunks[1][800..], chunks[2][..200]);
    }

    #[test]
    fn paragraph_breaks_are_preferred_boundaries() {
        let splitter = TextSplitter::new(120, 30);
        let text = "First paragraph, fairly compact in size.\n\n\
                    Second paragraph, also fairly compact here.\n\n\
                    Third paragraph rounds out the sample text.";
        let chunks = splitter.split(text);

        assert!(chunks.len() > 1);
        // Every chunk is a verbatim slice of the input.
        for chunk in &chunks {
            assert!(text.contains(chunk.as_str()));
        }
        // The full text is covered: first chunk anchors the start, last the end.
        assert!(text.starts_with(chunks.first().unwrap().as_str()));
        assert!(text.ends_with(chunks.last().unwrap().as_str()));
    }

    #[test]
    fn chunk_units_inherits_metadata_and_numbers_chunks_per_unit() {
        let splitter = TextSplitter::new(100, 20);
        let long = (0..20).map(|_| "alpha beta gamma delta ").collect::<String>();
        let units = vec![
            DocumentUnit::new(long, Path::new("doc.pdf"), 0, SourceFormat::Pdf),
            DocumentUnit::new("short page".into(), Path::new("doc.pdf"), 1, SourceFormat::Pdf),
        ];

        let chunks = splitter.chunk_units(&units);
        assert!(chunks.len() > 2);

        let unit0: Vec<_> = chunks.iter().filter(|c| c.metadata.unit_index == 0).collect();
        for (i, chunk) in unit0.iter().enumerate() {
            assert_eq!(chunk.metadata.chunk_index, i);
            assert_eq!(chunk.metadata.source, "doc.pdf");
            assert_eq!(chunk.metadata.format, "pdf");
        }

        let unit1: Vec<_> = chunks.iter().filter(|c| c.metadata.unit_index == 1).collect();
        assert_eq!(unit1.len(), 1);
        assert_eq!(unit1[0].metadata.chunk_index, 0);
        assert_eq!(unit1[0].content, "short page");
    }
}
