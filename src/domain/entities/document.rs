use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::{PipelineError, Result};

/// A raw source text, immutable once loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub source_id: String,
    pub content: String,
}

impl Document {
    pub fn new(source_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            content: content.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// A bounded segment of one document, never mutated after creation.
///
/// `sequence_index` records the original order for debuggability; retrieval
/// never consults it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: Uuid,
    pub text: String,
    pub source_id: String,
    pub sequence_index: usize,
}

impl Chunk {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>, sequence_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            source_id: source_id.into(),
            sequence_index,
        }
    }
}

/// Separators tried coarsest-first when looking for cut points.
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Splits a document into overlapping chunks of at most `chunk_size`
/// characters of body text.
///
/// The first separator whose pieces all fit within `chunk_size` wins, so a
/// document of short paragraphs is never cut mid-word. Pieces keep their
/// trailing separator and are greedily packed, which makes every chunk body a
/// contiguous slice of the original text. Each chunk after the first is
/// prefixed with the `overlap` characters preceding its body, so stripping
/// those prefixes and concatenating reproduces the document exactly.
///
/// A blank document yields zero chunks and a warning, not an error.
pub fn split_document(doc: &Document, chunk_size: usize, overlap: usize) -> Result<Vec<Chunk>> {
    if chunk_size == 0 {
        return Err(PipelineError::config("chunk_size must be positive"));
    }
    if overlap >= chunk_size {
        return Err(PipelineError::config(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    if doc.is_blank() {
        tracing::warn!(source_id = %doc.source_id, "document is empty, producing no chunks");
        return Ok(Vec::new());
    }

    let content = doc.content.as_str();
    let boundaries = chunk_boundaries(content, chunk_size);

    let chunks = boundaries
        .iter()
        .enumerate()
        .map(|(i, &(start, end))| {
            let body = &content[start..end];
            let text = if i == 0 {
                body.to_string()
            } else {
                let prefix_start = chars_before(content, start, overlap);
                format!("{}{}", &content[prefix_start..start], body)
            };
            Chunk::new(&doc.source_id, text, i)
        })
        .collect();

    Ok(chunks)
}

/// Byte ranges of chunk bodies: contiguous, covering the whole text.
fn chunk_boundaries(content: &str, chunk_size: usize) -> Vec<(usize, usize)> {
    let pieces = split_pieces(content, chunk_size);

    let mut boundaries = Vec::new();
    let mut start = 0;
    let mut current_chars = 0;

    for (piece_start, piece_chars) in pieces {
        if current_chars > 0 && current_chars + piece_chars > chunk_size {
            boundaries.push((start, piece_start));
            start = piece_start;
            current_chars = piece_chars;
        } else {
            current_chars += piece_chars;
        }
    }
    boundaries.push((start, content.len()));
    boundaries
}

/// Splits on the first separator whose pieces all fit `chunk_size`, keeping
/// each separator attached to the piece it terminates. Falls back to bare
/// character windows, which always fit.
///
/// Returns `(start_byte, char_count)` per piece.
fn split_pieces(content: &str, chunk_size: usize) -> Vec<(usize, usize)> {
    for sep in SEPARATORS {
        let mut pieces = Vec::new();
        let mut offset = 0;
        let mut fits = true;
        for part in content.split_inclusive(sep) {
            let chars = part.chars().count();
            if chars > chunk_size {
                fits = false;
                break;
            }
            pieces.push((offset, chars));
            offset += part.len();
        }
        if fits {
            return pieces;
        }
    }

    let mut pieces = Vec::new();
    let mut chars_in_window = 0;
    for (byte_idx, _) in content.char_indices() {
        if chars_in_window == 0 {
            pieces.push((byte_idx, 0));
        }
        let last = pieces.last_mut().unwrap();
        last.1 += 1;
        chars_in_window += 1;
        if chars_in_window == chunk_size {
            chars_in_window = 0;
        }
    }
    pieces
}

/// Byte index `count` characters before `byte_idx`, clamped to the start.
fn chars_before(content: &str, byte_idx: usize, count: usize) -> usize {
    if count == 0 {
        return byte_idx;
    }
    let mut idx = byte_idx;
    let mut remaining = count;
    for (i, _) in content[..byte_idx].char_indices().rev() {
        idx = i;
        remaining -= 1;
        if remaining == 0 {
            break;
        }
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(content: &str) -> Document {
        Document::new("test.txt", content)
    }

    /// Strips overlap prefixes and concatenates chunk bodies.
    fn reconstruct(chunks: &[Chunk], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(&chunk.text);
            } else {
                let taken = overlap.min(out.chars().count());
                let skip: String = chunk.text.chars().skip(taken).collect();
                out.push_str(&skip);
            }
        }
        out
    }

    #[test]
    fn single_chunk_when_document_fits() {
        let chunks = split_document(&doc("Hello world.\n\nShort doc."), 100, 20).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "Hello world.\n\nShort doc.");
        assert_eq!(chunks[0].sequence_index, 0);
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = split_document(&doc("text"), 0, 0).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn rejects_overlap_not_smaller_than_chunk_size() {
        let err = split_document(&doc("text"), 10, 10).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
        let err = split_document(&doc("text"), 10, 15).unwrap_err();
        assert!(matches!(err, PipelineError::Config(_)));
    }

    #[test]
    fn blank_document_yields_no_chunks() {
        assert!(split_document(&doc(""), 50, 10).unwrap().is_empty());
        assert!(split_document(&doc("   \n\n  "), 50, 10).unwrap().is_empty());
    }

    #[test]
    fn prefers_paragraph_breaks_when_they_fit() {
        let content = "First paragraph here.\n\nSecond paragraph here.\n\nThird one.";
        let chunks = split_document(&doc(content), 30, 5).unwrap();
        // Every chunk body starts at a paragraph boundary, never mid-word.
        assert!(chunks.len() >= 2);
        for chunk in &chunks[1..] {
            let body: String = chunk.text.chars().skip(5).collect();
            assert!(content.contains(&body));
        }
    }

    #[test]
    fn falls_back_to_word_splits_for_long_lines() {
        let content = "Paris is the capital of France. The Eiffel Tower is in Paris.";
        let chunks = split_document(&doc(content), 50, 10).unwrap();
        assert!(chunks.len() >= 2);
        // No chunk body exceeds the size bound.
        assert!(chunks[0].text.chars().count() <= 50);
    }

    #[test]
    fn adjacent_chunks_share_overlap_text() {
        let content = "Paris is the capital of France. The Eiffel Tower is in Paris.";
        let chunks = split_document(&doc(content), 50, 10).unwrap();
        let tail: String = {
            let first = &chunks[0].text;
            let count = first.chars().count();
            first.chars().skip(count - 10).collect()
        };
        let head: String = chunks[1].text.chars().take(10).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn round_trips_exactly() {
        let repeated = "word ".repeat(40);
        let cases = [
            "Paris is the capital of France. The Eiffel Tower is in Paris.",
            "a\n\nbb\n\nccc\n\ndddd\n\neeeee",
            "one line\nanother line\nthird line that is quite a bit longer than the rest",
            repeated.trim_end(),
        ];
        for content in cases {
            for (size, overlap) in [(50, 10), (12, 4), (8, 1)] {
                let chunks = split_document(&doc(content), size, overlap).unwrap();
                assert_eq!(reconstruct(&chunks, overlap), content, "size={size} overlap={overlap}");
            }
        }
    }

    #[test]
    fn character_fallback_handles_unbroken_text() {
        let content = "abcdefghijklmnopqrstuvwxyz";
        let chunks = split_document(&doc(content), 10, 3).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, "abcdefghij");
        assert_eq!(reconstruct(&chunks, 3), content);
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let content = "héllo wörld ünïcode tèxt çontent hére ágain möre wörds";
        let chunks = split_document(&doc(content), 16, 4).unwrap();
        assert!(chunks.len() >= 2);
        assert_eq!(reconstruct(&chunks, 4), content);
    }

    #[test]
    fn deterministic_boundaries() {
        let content = "Some repeated content.\n\nWith a few paragraphs.\n\nAnd words.";
        let a = split_document(&doc(content), 25, 5).unwrap();
        let b = split_document(&doc(content), 25, 5).unwrap();
        let texts_a: Vec<_> = a.iter().map(|c| &c.text).collect();
        let texts_b: Vec<_> = b.iter().map(|c| &c.text).collect();
        assert_eq!(texts_a, texts_b);
    }

    #[test]
    fn sequence_indexes_are_ordered() {
        let content = "word ".repeat(30);
        let chunks = split_document(&doc(&content), 20, 5).unwrap();
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.sequence_index, i);
            assert_eq!(chunk.source_id, "test.txt");
        }
    }
}
