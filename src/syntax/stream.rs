//! Case-folding view over the source text.
//!
//! The recognizer only ever sees [`CaseInsensitiveStream::folded`], an ASCII
//! upper-cased copy of the input. ASCII folding never changes byte lengths, so
//! every offset the recognizer reports is also an offset into the original
//! text, which is what token text, de-quoting and error positions read from.

use std::borrow::Cow;

/// Source text paired with its upper-cased matching view.
#[derive(Debug, Clone)]
pub struct CaseInsensitiveStream<'a> {
    source: &'a str,
    folded: Cow<'a, str>,
    line_starts: Vec<usize>,
}

impl<'a> CaseInsensitiveStream<'a> {
    pub fn new(source: &'a str) -> Self {
        let folded = if source.bytes().any(|b| b.is_ascii_lowercase()) {
            Cow::Owned(source.to_ascii_uppercase())
        } else {
            Cow::Borrowed(source)
        };

        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(idx, _)| idx + 1))
            .collect();

        Self {
            source,
            folded,
            line_starts,
        }
    }

    /// The original text, casing preserved.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// The text the recognizer matches against.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    /// Original text in `start..end`; empty when the range is not valid.
    pub fn text(&self, start: usize, end: usize) -> &'a str {
        self.source.get(start..end).unwrap_or("")
    }

    /// Original character starting at `offset`, if any.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.source.get(offset..).and_then(|rest| rest.chars().next())
    }

    /// 1-based line and 0-based column (in characters) of a byte offset.
    pub fn position(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.source.len());
        let line_index = match self.line_starts.binary_search(&offset) {
            Ok(index) => index,
            Err(index) => index - 1,
        };
        let line_start = self.line_starts[line_index];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());
        (line_index + 1, column)
    }
}
