//! Turns low-level recognizer failures into positioned [`SyntaxError`]s.
//!
//! pest reports the furthest position it reached together with the rules it
//! expected there. The reporter re-lexes the input at that position to find
//! the offending token, so the error points at a whole token (or at the first
//! character nothing can be lexed from) rather than at a raw byte offset.

use pest::error::{Error as PestError, ErrorVariant, InputLocation};
use pest::Parser;

use super::grammar::exhaustive::{ExhaustiveGrammar, Rule as LexRule};
use super::grammar::{GrammarRule, Symbol};
use super::stream::CaseInsensitiveStream;
use super::Span;
use crate::errors::{SyntaxError, SyntaxErrorKind};

/// What sits at the failure offset.
enum Offending<'a> {
    Token { text: &'a str, span: Span },
    Unrecognized { ch: char, offset: usize },
    Eof { offset: usize },
}

/// Error listener shared by the tokenizer and the recognizer.
///
/// Stateless apart from the stream it reads positions from; the first error of
/// an attempt is converted and returned, nothing is accumulated.
pub struct SyntaxErrorReporter<'s, 'a> {
    stream: &'s CaseInsensitiveStream<'a>,
}

impl<'s, 'a> SyntaxErrorReporter<'s, 'a> {
    pub fn new(stream: &'s CaseInsensitiveStream<'a>) -> Self {
        Self { stream }
    }

    /// Converts a grammar mismatch reported by pest.
    pub(crate) fn recognition_error<R>(&self, error: PestError<R>) -> SyntaxError
    where
        R: GrammarRule + Send + Sync + 'static,
    {
        let offset = match error.location {
            InputLocation::Pos(pos) => pos,
            InputLocation::Span((start, _)) => start,
        };
        let expected = match &error.variant {
            ErrorVariant::ParsingError { positives, .. } => expected_names(positives),
            ErrorVariant::CustomError { .. } => Vec::new(),
        };

        let offending = self.offending_at(self.skip_layout(offset));
        let (message, span) = match offending {
            Offending::Unrecognized { ch, offset } => {
                (unrecognized_message(ch), char_span(offset, ch))
            }
            Offending::Token { text, span } => {
                (mismatch_message(&escape(text), &expected), span)
            }
            Offending::Eof { offset } => {
                (mismatch_message("<EOF>", &expected), Span::new(offset, offset))
            }
        };

        self.positioned(SyntaxErrorKind::Recognition, message, span)
            .with_cause(error)
    }

    /// Converts a tokenizer failure at `offset`.
    pub fn lexer_error(&self, offset: usize) -> SyntaxError {
        let offset = offset.min(self.stream.len());
        match self.stream.char_at(offset) {
            Some(ch) => self.positioned(
                SyntaxErrorKind::Recognition,
                unrecognized_message(ch),
                char_span(offset, ch),
            ),
            None => self.positioned(
                SyntaxErrorKind::Recognition,
                "token recognition error at: '<EOF>'",
                Span::new(offset, offset),
            ),
        }
    }

    /// Builds an error located at the start of `span`.
    pub fn positioned(
        &self,
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        span: Span,
    ) -> SyntaxError {
        let (line, column) = self.stream.position(span.start);
        SyntaxError::new(kind, message, line, column).with_span(span)
    }

    fn offending_at(&self, offset: usize) -> Offending<'a> {
        let Some(rest) = self.stream.folded().get(offset..) else {
            return Offending::Eof {
                offset: self.stream.len(),
            };
        };
        if rest.is_empty() {
            return Offending::Eof { offset };
        }

        let lexed = ExhaustiveGrammar::parse(LexRule::single_token, rest)
            .ok()
            .and_then(|mut pairs| pairs.next())
            .map(|pair| pair.as_span().end());
        match lexed {
            Some(len) if len > 0 => {
                let span = Span::new(offset, offset + len);
                Offending::Token {
                    text: self.stream.text(span.start, span.end),
                    span,
                }
            }
            _ => match self.stream.char_at(offset) {
                Some(ch) => Offending::Unrecognized { ch, offset },
                None => Offending::Eof { offset },
            },
        }
    }

    /// Skips whitespace and complete comments starting at `offset`.
    fn skip_layout(&self, mut offset: usize) -> usize {
        let folded = self.stream.folded();
        while let Some(rest) = folded.get(offset..) {
            if let Some(ch) = rest.chars().next().filter(|c| matches!(c, ' ' | '\t' | '\r' | '\n')) {
                offset += ch.len_utf8();
            } else if rest.starts_with("--") {
                offset += rest.find('\n').unwrap_or(rest.len());
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => offset += end + 4,
                    None => break,
                }
            } else {
                break;
            }
        }
        offset
    }
}

/// Rules are reported by the tokens they start with, never by their names.
fn expected_names<R: GrammarRule>(positives: &[R]) -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for symbol in positives.iter().filter_map(|rule| rule.symbol()) {
        match symbol {
            Symbol::Rule(rule) => names.extend_from_slice(rule.expected_tokens()),
            Symbol::Token(kind) => names.push(kind.display_name()),
        }
    }
    names.sort_unstable();
    names.dedup();
    names
}

fn mismatch_message(found: &str, expected: &[&str]) -> String {
    match expected {
        [] => format!("no viable alternative at input '{found}'"),
        [single] => format!("mismatched input '{found}' expecting {single}"),
        many => format!("mismatched input '{found}' expecting {{{}}}", many.join(", ")),
    }
}

fn unrecognized_message(ch: char) -> String {
    format!("token recognition error at: '{}'", escape(ch.encode_utf8(&mut [0; 4])))
}

fn char_span(offset: usize, ch: char) -> Span {
    Span::new(offset, offset + ch.len_utf8())
}

fn escape(text: &str) -> String {
    text.replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_lists_expected_tokens() {
        assert_eq!(
            mismatch_message("FROM", &["'('", "IDENTIFIER"]),
            "mismatched input 'FROM' expecting {'(', IDENTIFIER}"
        );
        assert_eq!(
            mismatch_message("<EOF>", &["')'"]),
            "mismatched input '<EOF>' expecting ')'"
        );
        assert_eq!(
            mismatch_message("x", &[]),
            "no viable alternative at input 'x'"
        );
    }

    #[test]
    fn lexer_error_names_the_character() {
        let stream = CaseInsensitiveStream::new("SELECT #");
        let err = SyntaxErrorReporter::new(&stream).lexer_error(7);
        assert_eq!(err.message(), "token recognition error at: '#'");
        assert_eq!((err.line(), err.column()), (1, 7));
    }

    #[test]
    fn offending_token_keeps_original_case() {
        let stream = CaseInsensitiveStream::new("select from");
        let reporter = SyntaxErrorReporter::new(&stream);
        match reporter.offending_at(7) {
            Offending::Token { text, span } => {
                assert_eq!(text, "from");
                assert_eq!(span, Span::new(7, 11));
            }
            _ => panic!("expected a token"),
        }
    }

    #[test]
    fn layout_is_skipped_before_the_offending_token() {
        let stream = CaseInsensitiveStream::new("a  /* c */ -- d\n  b");
        let reporter = SyntaxErrorReporter::new(&stream);
        assert_eq!(reporter.skip_layout(1), 18);
    }

    #[test]
    fn newlines_in_token_text_are_escaped() {
        assert_eq!(escape("'a\nb'"), "'a\\nb'");
    }
}
