//! Line-indexed text documents
//!
//! A [`Document`] is the in-memory form of the file under patch: an ordered
//! list of lines, each keeping its own terminator so that writing the
//! document back reproduces untouched lines byte for byte.

use crate::hash::ContentHash;

/// Ordered sequence of lines making up one file
///
/// # Invariants
/// - Every entry except possibly the last ends with `"\n"` when built with
///   [`Document::from_text`]
/// - `Document::from_text(t).to_text() == t`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    lines: Vec<String>,
    fallback_eol: &'static str,
}

impl Document {
    /// Split text into lines, keeping terminators
    ///
    /// Text without any terminator still reports `"\n"` as its
    /// [`line_ending`](Self::line_ending).
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.split_inclusive('\n').map(str::to_owned).collect(),
            fallback_eol: "\n",
        }
    }

    /// Build from already-split entries, taken verbatim
    ///
    /// Entries without terminators stay unterminated, and so do guard lines
    /// inserted among them.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            fallback_eol: "",
        }
    }

    /// Concatenate all entries back into file text
    #[must_use]
    pub fn to_text(&self) -> String {
        self.lines.concat()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the document has no lines
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Entry at `index`, terminator included
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    /// All entries
    #[inline]
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Consume into the entry list
    #[inline]
    #[must_use]
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Checksum of the concatenated text
    #[must_use]
    pub fn checksum(&self) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        for line in &self.lines {
            hasher.update(line.as_bytes());
        }
        ContentHash::new(*hasher.finalize().as_bytes())
    }

    /// First line terminator used anywhere in the document
    ///
    /// When no entry carries one, `"\n"` for documents read from text and
    /// `""` for documents built from pre-split entries.
    #[must_use]
    pub fn line_ending(&self) -> &str {
        self.lines
            .iter()
            .map(|line| terminator(line))
            .find(|eol| !eol.is_empty())
            .unwrap_or(self.fallback_eol)
    }

    /// Replace the entry at `index` with `block`
    ///
    /// # Panics
    /// Panics if `index` is out of bounds; callers resolve indices first.
    pub(crate) fn expand_line(&mut self, index: usize, block: Vec<String>) {
        self.lines.splice(index..=index, block);
    }
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

/// Leading whitespace of a line, never including a terminator
#[must_use]
pub fn indentation(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|&(_, c)| !c.is_whitespace() || c == '\n' || c == '\r')
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

/// Trailing line terminator (`"\r\n"`, `"\n"` or `""`)
#[must_use]
pub fn terminator(line: &str) -> &str {
    if line.ends_with("\r\n") {
        &line[line.len() - 2..]
    } else if line.ends_with('\n') {
        &line[line.len() - 1..]
    } else {
        ""
    }
}

/// Line content without its terminator
#[must_use]
pub fn body(line: &str) -> &str {
    &line[..line.len() - terminator(line).len()]
}
