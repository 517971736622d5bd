//! Content hashing for architecture files and derived artifacts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 128-bit XXH3 content hash.
///
/// Identifies the exact text an architecture description was parsed from, so
/// reports and downstream stages can tell whether two runs saw the same input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash([u8; 16]);

impl ContentHash {
    /// Computes a content hash from a byte slice using XXH3-128.
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = xxhash_rust::xxh3::xxh3_128(data);
        Self(hash.to_le_bytes())
    }

    /// Returns the first eight hex digits, enough to tell inputs apart in a report.
    pub fn short(&self) -> String {
        self.0[..4].iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        let a = ContentHash::from_bytes(b"io_rat 2\n");
        let b = ContentHash::from_bytes(b"io_rat 2\n");
        assert_eq!(a, b);
    }

    #[test]
    fn whitespace_changes_hash() {
        let a = ContentHash::from_bytes(b"io_rat 2\n");
        let b = ContentHash::from_bytes(b"io_rat  2\n");
        assert_ne!(a, b);
    }

    #[test]
    fn display_is_full_hex() {
        let s = format!("{}", ContentHash::from_bytes(b"arch"));
        assert_eq!(s.len(), 32);
        assert!(s.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn short_is_prefix_of_display() {
        let h = ContentHash::from_bytes(b"arch");
        assert_eq!(h.short().len(), 8);
        assert!(format!("{h}").starts_with(&h.short()));
        assert_eq!(format!("{h:?}"), format!("ContentHash({})", h.short()));
    }

    #[test]
    fn serde_roundtrip() {
        let h = ContentHash::from_bytes(b"subblock_lut_size 4");
        let json = serde_json::to_string(&h).unwrap();
        let back: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(h, back);
    }
}
