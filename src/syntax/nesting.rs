//! Nesting-depth guard run before recognition.
//!
//! The recognizer is recursive descent, so its stack use grows with the
//! nesting of the input. A stack overflow cannot be caught in Rust, so deep
//! input is rejected up front instead: a lexical scan counts open parentheses
//! plus the `EXPLAIN` / `DEBUG` statement prefixes and fails once the
//! configured maximum is crossed.
//!
//! Only the leading prefix chain of a statement nests: `EXPLAIN` and `DEBUG`
//! at the start of the input, or right after an earlier prefix and its
//! option list. Anywhere else both words are ordinary non-reserved names.

use tracing::debug;

use super::grammar::EntryPoint;
use super::reporter::SyntaxErrorReporter;
use super::stream::CaseInsensitiveStream;
use super::Span;
use crate::errors::{SyntaxError, SyntaxErrorKind};

pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Largest accepted limit. Deeper input overflows the stack of a debug-build
/// test thread (2 MiB) inside the generated recognizer.
pub const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestingGuard {
    max_depth: usize,
}

impl Default for NestingGuard {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NESTING_DEPTH)
    }
}

/// Where the scan stands relative to the statement prefix chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    /// A prefix may still follow; `after_prefix` is set right after one.
    Open { after_prefix: bool },
    /// Inside a prefix option list opened at this depth.
    Options { depth: usize },
    /// The statement body has started.
    Closed,
}

impl NestingGuard {
    /// Limits above [`MAX_NESTING_DEPTH`] are clamped to it.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.min(MAX_NESTING_DEPTH),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Fails with a `TooLarge` error at the token that crossed the limit.
    pub fn check(
        &self,
        stream: &CaseInsensitiveStream<'_>,
        entry: EntryPoint,
    ) -> Result<(), SyntaxError> {
        let bytes = stream.folded().as_bytes();
        let mut depth = 0usize;
        let mut prefix = match entry {
            EntryPoint::Statement => Prefix::Open { after_prefix: false },
            EntryPoint::Expression => Prefix::Closed,
        };
        let mut i = 0;

        while i < bytes.len() {
            let start = i;
            match bytes[i] {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    i += 1;
                    continue;
                }
                b'-' if bytes.get(i + 1) == Some(&b'-') => {
                    while i < bytes.len() && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                }
                b'/' if bytes.get(i + 1) == Some(&b'*') => {
                    i = skip_block_comment(bytes, i);
                    continue;
                }
                b'(' => {
                    prefix = match prefix {
                        Prefix::Open { after_prefix: true } => Prefix::Options { depth },
                        Prefix::Options { .. } => prefix,
                        _ => Prefix::Closed,
                    };
                    depth += 1;
                    i += 1;
                }
                b')' => {
                    depth = depth.saturating_sub(1);
                    prefix = match prefix {
                        Prefix::Options { depth: open } if open == depth => {
                            Prefix::Open { after_prefix: false }
                        }
                        Prefix::Options { .. } => prefix,
                        _ => Prefix::Closed,
                    };
                    i += 1;
                    continue;
                }
                quote @ (b'\'' | b'"' | b'`') => {
                    i = skip_quoted(bytes, i, quote);
                    prefix = close_unless_options(prefix);
                    continue;
                }
                b if b.is_ascii_alphanumeric() || b == b'_' => {
                    while i < bytes.len() && is_word_byte(bytes[i]) {
                        i += 1;
                    }
                    let is_prefix = matches!(&bytes[start..i], b"EXPLAIN" | b"DEBUG");
                    match prefix {
                        Prefix::Open { .. } if is_prefix => {
                            prefix = Prefix::Open { after_prefix: true };
                            depth += 1;
                        }
                        _ => {
                            prefix = close_unless_options(prefix);
                            continue;
                        }
                    }
                }
                _ => {
                    prefix = close_unless_options(prefix);
                    i += 1;
                    continue;
                }
            }

            if depth > self.max_depth {
                debug!(
                    entry = entry.name(),
                    offset = start,
                    max_depth = self.max_depth,
                    "nesting depth exceeded"
                );
                let end = if bytes[start] == b'(' { start + 1 } else { i };
                return Err(SyntaxErrorReporter::new(stream).positioned(
                    SyntaxErrorKind::TooLarge,
                    format!(
                        "{} is too large (maximum nesting depth of {} exceeded)",
                        entry.name(),
                        self.max_depth
                    ),
                    Span::new(start, end),
                ));
            }
        }
        Ok(())
    }
}

fn close_unless_options(prefix: Prefix) -> Prefix {
    match prefix {
        Prefix::Options { .. } => prefix,
        _ => Prefix::Closed,
    }
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'@'
}

/// Index just past the closing quote; a doubled quote is an escape.
fn skip_quoted(bytes: &[u8], open: usize, quote: u8) -> usize {
    let mut i = open + 1;
    while i < bytes.len() {
        if bytes[i] == quote {
            if bytes.get(i + 1) == Some(&quote) {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    bytes.len()
}

fn skip_block_comment(bytes: &[u8], open: usize) -> usize {
    let mut i = open + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(text: &str, max: usize) -> Result<(), SyntaxError> {
        let stream = CaseInsensitiveStream::new(text);
        NestingGuard::new(max).check(&stream, EntryPoint::Statement)
    }

    #[test]
    fn shallow_input_passes() {
        assert!(check("SELECT ((1))", 2).is_ok());
        assert!(check("SELECT (1), (2), (3)", 1).is_ok());
    }

    #[test]
    fn crossing_the_limit_points_at_the_parenthesis() {
        let err = check("SELECT (((1)))", 2).unwrap_err();
        assert_eq!(err.kind(), SyntaxErrorKind::TooLarge);
        assert_eq!(
            err.message(),
            "statement is too large (maximum nesting depth of 2 exceeded)"
        );
        assert_eq!((err.line(), err.column()), (1, 9));
    }

    #[test]
    fn explain_prefixes_count_as_nesting() {
        let err = check("explain explain explain SELECT 1", 2).unwrap_err();
        assert_eq!(err.column(), 16);
        assert!(check("SELECT explained FROM t", 0).is_ok());
    }

    #[test]
    fn prefix_words_used_as_names_do_not_nest() {
        let columns = vec!["debug, explain"; 40].join(", ");
        assert!(check(&format!("SELECT {columns} FROM t"), 1).is_ok());
        assert!(check("SELECT a FROM explain WHERE debug = 1", 0).is_ok());
        assert!(check("EXPLAIN SELECT explain, debug FROM t", 1).is_ok());
    }

    #[test]
    fn option_lists_keep_the_prefix_chain_open() {
        assert!(check("EXPLAIN (PLAN PARSED) DEBUG SELECT 1", 3).is_ok());
        let err = check("EXPLAIN (FORMAT TEXT) DEBUG SELECT 1", 1).unwrap_err();
        assert_eq!(err.column(), 8);
        let err = check("EXPLAIN (PLAN PARSED) DEBUG (PLAN ANALYZED) SELECT 1", 2).unwrap_err();
        assert_eq!(err.column(), 28);
    }

    #[test]
    fn limits_are_clamped_to_the_ceiling() {
        assert_eq!(NestingGuard::new(100_000).max_depth(), MAX_NESTING_DEPTH);
        assert_eq!(NestingGuard::new(3).max_depth(), 3);
        assert_eq!(NestingGuard::default().max_depth(), DEFAULT_MAX_NESTING_DEPTH);
    }

    #[test]
    fn quoted_text_and_comments_are_ignored() {
        assert!(check("SELECT '((((' , \"((\" /* (((( */ -- ((((\n", 0).is_ok());
        assert!(check("SELECT 'it''s (' ", 0).is_ok());
    }

    #[test]
    fn expression_entry_is_named_in_the_message() {
        let text = "(".repeat(10);
        let stream = CaseInsensitiveStream::new(&text);
        let err = NestingGuard::new(3)
            .check(&stream, EntryPoint::Expression)
            .unwrap_err();
        assert!(err.message().starts_with("expression is too large"));
    }
}
