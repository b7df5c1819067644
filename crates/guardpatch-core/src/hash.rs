//! Content checksums for documents
//!
//! Provides [`ContentHash`], a 32-byte BLAKE3 digest used to tell whether a
//! patch run changed a file and to fingerprint files in reports.

use std::fmt::{self, Display, Formatter};

/// A 32-byte content hash (BLAKE3)
///
/// Cheap to copy. Two documents with the same text always share a hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Wrap raw digest bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Hash arbitrary bytes
    #[inline]
    #[must_use]
    pub fn compute(data: &[u8]) -> Self {
        Self::new(*blake3::hash(data).as_bytes())
    }

    /// Hash text as UTF-8 bytes
    #[inline]
    #[must_use]
    pub fn of_text(text: &str) -> Self {
        Self::compute(text.as_bytes())
    }

    /// First 16 hex chars, for log lines
    #[inline]
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl Display for ContentHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl serde::Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_hash() {
        assert_eq!(ContentHash::of_text("a\nb\n"), ContentHash::of_text("a\nb\n"));
        assert_ne!(ContentHash::of_text("a\nb\n"), ContentHash::of_text("a\nb"));
    }

    #[test]
    fn short_is_prefix_of_full_hex() {
        let hash = ContentHash::of_text("x");
        assert_eq!(hash.short().len(), 16);
        assert!(hash.to_string().starts_with(&hash.short()));
    }

    #[test]
    fn serializes_as_hex_string_in_json() {
        let hash = ContentHash::of_text("test");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{hash}\""));
        assert_eq!(json.len(), 66);
    }
}
