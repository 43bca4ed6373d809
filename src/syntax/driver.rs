//! Two-phase parse driver.
//!
//! Every parse first runs the optimistic grammar, which commits at each
//! prediction point after a short lookahead. Only when that attempt fails is
//! the input re-parsed with the exhaustive grammar, which backtracks through
//! every alternative; its outcome is final.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::grammar::{EntryPoint, PredictionMode};
use super::nesting::NestingGuard;
use super::normalizer::TreeNormalizer;
use super::recognizer::Recognizer;
use super::stream::CaseInsensitiveStream;
use super::tree::{RuleNode, Token};
use crate::errors::SyntaxError;

/// Which attempts the driver makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseStrategy {
    /// Optimistic first, exhaustive on any failure.
    #[default]
    Adaptive,
    /// Exhaustive only.
    Exhaustive,
}

/// A normalized tree together with the stream its offsets point into.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'a> {
    pub entry: EntryPoint,
    pub root: RuleNode,
    pub stream: CaseInsensitiveStream<'a>,
}

impl<'a> SyntaxTree<'a> {
    pub fn source(&self) -> &'a str {
        self.stream.source()
    }

    /// Original text of `token`.
    pub fn text(&self, token: &Token) -> &'a str {
        token.text(&self.stream)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveDriver {
    strategy: ParseStrategy,
    guard: NestingGuard,
}

impl AdaptiveDriver {
    pub fn new(strategy: ParseStrategy, max_nesting_depth: usize) -> Self {
        Self {
            strategy,
            guard: NestingGuard::new(max_nesting_depth),
        }
    }

    pub fn strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn parse<'a>(&self, entry: EntryPoint, text: &'a str) -> Result<SyntaxTree<'a>, SyntaxError> {
        let stream = CaseInsensitiveStream::new(text);
        self.guard.check(&stream, entry)?;

        let root = {
            let mut recognizer = Recognizer::new(&stream);
            recognizer.add_parse_listener(Box::new(TreeNormalizer::new()));
            self.attempt(&mut recognizer, entry)?
        };

        Ok(SyntaxTree {
            entry,
            root,
            stream,
        })
    }

    /// Runs the attempts the strategy calls for, returning the first success.
    fn attempt(
        &self,
        recognizer: &mut Recognizer<'_, '_>,
        entry: EntryPoint,
    ) -> Result<RuleNode, SyntaxError> {
        if self.strategy == ParseStrategy::Adaptive {
            recognizer.set_prediction_mode(PredictionMode::Optimistic);
            match recognizer.recognize(entry) {
                Ok(root) => return Ok(root),
                Err(error) => {
                    debug!(
                        entry = entry.name(),
                        line = error.line(),
                        column = error.column(),
                        error = error.message(),
                        "optimistic prediction failed, retrying with exhaustive prediction"
                    );
                    recognizer.reset();
                }
            }
        }

        recognizer.set_prediction_mode(PredictionMode::Exhaustive);
        recognizer.recognize(entry)
    }

    /// Recognizes with one prediction mode only, without fallback.
    pub fn parse_with_mode<'a>(
        &self,
        entry: EntryPoint,
        mode: PredictionMode,
        text: &'a str,
    ) -> Result<SyntaxTree<'a>, SyntaxError> {
        let stream = CaseInsensitiveStream::new(text);
        self.guard.check(&stream, entry)?;

        let root = {
            let mut recognizer = Recognizer::new(&stream);
            recognizer.add_parse_listener(Box::new(TreeNormalizer::new()));
            recognizer.set_prediction_mode(mode);
            recognizer.recognize(entry)?
        };

        Ok(SyntaxTree {
            entry,
            root,
            stream,
        })
    }

    /// Lexes `text` into tokens, comments included.
    pub fn tokenize(&self, text: &str) -> Result<Vec<Token>, SyntaxError> {
        let stream = CaseInsensitiveStream::new(text);
        let tokens = Recognizer::new(&stream).tokenize();
        tokens
    }
}
