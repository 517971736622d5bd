//! A loaded file with a line-start index for line/column lookup.

use crate::file_id::FileId;
use crate::span::Span;
use kiln_common::ContentHash;
use std::path::PathBuf;

/// A file loaded into the [`SourceDb`](crate::SourceDb).
pub struct SourceFile {
    /// The identifier of this file within its database.
    pub id: FileId,
    /// Filesystem path, or a synthetic name for in-memory text.
    pub path: PathBuf,
    /// The full text of the file.
    pub content: String,
    /// Byte offset of each line start; the first entry is always 0.
    line_starts: Vec<u32>,
    /// Hash of `content`.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile`, indexing its line starts and hashing its content.
    pub fn new(id: FileId, path: PathBuf, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_bytes(content.as_bytes());
        Self {
            id,
            path,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let line_idx = match self.line_starts.binary_search(&byte_offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        let line = (line_idx as u32) + 1;
        let col = byte_offset - self.line_starts[line_idx] + 1;
        (line, col)
    }

    /// Number of physical lines; a trailing newline does not open a new line.
    pub fn line_count(&self) -> u32 {
        let n = self.line_starts.len() as u32;
        if self.content.is_empty() {
            0
        } else if self.content.ends_with('\n') {
            n - 1
        } else {
            n
        }
    }

    /// An empty span positioned at the end of the file.
    pub fn end_span(&self) -> Span {
        let end = self.content.len() as u32;
        Span::new(self.id, end, end)
    }

    /// Returns the text between two byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        &self.content[start as usize..end as usize]
    }
}

fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_file(content: &str) -> SourceFile {
        SourceFile::new(
            FileId::from_raw(0),
            PathBuf::from("test.arch"),
            content.to_string(),
        )
    }

    #[test]
    fn line_col_resolution() {
        let f = make_file("io_rat 2\ninpin class: 0 top\n");
        assert_eq!(f.line_col(0), (1, 1));
        assert_eq!(f.line_col(7), (1, 8));
        assert_eq!(f.line_col(9), (2, 1));
        assert_eq!(f.line_col(15), (2, 7));
    }

    #[test]
    fn line_count_ignores_trailing_newline() {
        assert_eq!(make_file("a\nb\n").line_count(), 2);
        assert_eq!(make_file("a\nb").line_count(), 2);
        assert_eq!(make_file("").line_count(), 0);
    }

    #[test]
    fn end_span_is_empty_at_eof() {
        let f = make_file("io_rat 2\n");
        let s = f.end_span();
        assert!(s.is_empty());
        assert_eq!(s.start, 9);
    }

    #[test]
    fn snippet_extraction() {
        let f = make_file("chan_width_io 1");
        assert_eq!(f.snippet(0, 13), "chan_width_io");
    }

    #[test]
    fn content_hash_computed() {
        let f = make_file("io_rat 2");
        assert_eq!(f.content_hash, ContentHash::from_bytes(b"io_rat 2"));
    }
}
