//! The single error channel of the parser.
//!
//! Every failure the front end can detect (grammar mismatch, token recognition
//! failure, disallowed identifier form, malformed non-reserved usage, input
//! nested too deeply) is reported as a [`SyntaxError`] carrying the message and
//! the position of the offending token. [`SyntaxErrorKind`] classifies the
//! failure without splitting the type.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::syntax::Span;

/// Shared, named copy of the parsed text used for diagnostic rendering.
pub type SourceArc = Arc<NamedSource<String>>;

/// Boxed underlying failure, usually the raw pest error.
pub type Cause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a [`SyntaxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SyntaxErrorKind {
    /// Rejected by the grammar or the tokenizer.
    Recognition,
    /// Backquoted or digit-leading identifier.
    DisallowedIdentifier,
    /// A non-reserved keyword production holding something other than one token.
    MalformedNonReserved,
    /// Nesting exceeded the recursion budget.
    TooLarge,
}

impl SyntaxErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyntaxErrorKind::Recognition => "recognition",
            SyntaxErrorKind::DisallowedIdentifier => "disallowed-identifier",
            SyntaxErrorKind::MalformedNonReserved => "malformed-non-reserved",
            SyntaxErrorKind::TooLarge => "too-large",
        }
    }
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A positioned syntax error. Immutable once built.
#[derive(Debug, Error)]
#[error("line {line}:{column}: {message}")]
pub struct SyntaxError {
    message: String,
    kind: SyntaxErrorKind,
    /// 1-based.
    line: usize,
    /// 0-based, in characters.
    column: usize,
    #[source]
    cause: Option<Cause>,
    span: Option<Span>,
    help: Option<String>,
    source_code: Option<SourceArc>,
}

impl SyntaxError {
    pub fn new(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        Self {
            message: message.into(),
            kind,
            line: line.max(1),
            column,
            cause: None,
            span: None,
            help: None,
            source_code: None,
        }
    }

    pub fn with_cause(mut self, cause: impl Into<Cause>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Marks the offending byte range, used as the diagnostic label.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attaches the parsed text so the diagnostic can render a snippet.
    pub fn with_source_code(mut self, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.source_code = Some(Arc::new(NamedSource::new(name, text.into())));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> SyntaxErrorKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("sqlfront::syntax::{}", self.kind)))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source_code
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        // A label without source code would point into nothing.
        self.source_code.as_ref()?;
        let span = self.span?;
        let len = if span.end > span.start {
            span.end - span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message.clone()), span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_the_position() {
        let err = SyntaxError::new(SyntaxErrorKind::Recognition, "boom", 3, 14);
        assert_eq!(err.to_string(), "line 3:14: boom");
        assert_eq!(err.message(), "boom");
    }

    #[test]
    fn line_is_never_zero() {
        let err = SyntaxError::new(SyntaxErrorKind::TooLarge, "deep", 0, 0);
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn cause_is_exposed_as_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "inner");
        let err = SyntaxError::new(SyntaxErrorKind::Recognition, "outer", 1, 0).with_cause(io);
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("inner"));
    }

    #[test]
    fn labels_need_source_code() {
        let err = SyntaxError::new(SyntaxErrorKind::Recognition, "x", 1, 7).with_span(Span::new(7, 11));
        assert!(err.labels().is_none());

        let err = err.with_source_code("statement", "SELECT FROM");
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 7);
        assert_eq!(labels[0].len(), 4);
    }
}
