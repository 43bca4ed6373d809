//! Syntax front end: from raw SQL text to a validated, normalized parse tree.
//!
//! The pipeline is `stream` (case folding) -> `nesting` (depth guard) ->
//! `recognizer` (pest, with `normalizer` attached as parse listener) driven by
//! `driver` in optimistic-then-exhaustive order. Every failure surfaces through
//! `reporter` as a [`SyntaxError`](crate::SyntaxError).

use serde::{Deserialize, Serialize};

pub mod driver;
pub mod grammar;
pub mod nesting;
pub mod normalizer;
pub mod recognizer;
pub mod reporter;
pub mod stream;
pub mod tree;

pub use driver::{AdaptiveDriver, ParseStrategy, SyntaxTree};
pub use grammar::{EntryPoint, PredictionMode, RuleId, TokenKind};
pub use nesting::{NestingGuard, DEFAULT_MAX_NESTING_DEPTH, MAX_NESTING_DEPTH};
pub use normalizer::{normalize, TreeNormalizer};
pub use recognizer::Recognizer;
pub use reporter::SyntaxErrorReporter;
pub use stream::CaseInsensitiveStream;
pub use tree::{walk, Channel, ParseListener, ParseTree, RuleNode, Token};

/// Half-open byte range into the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span {
            start: span.start(),
            end: span.end(),
        }
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}
