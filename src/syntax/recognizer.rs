//! Grammar recognizer and tree builder.
//!
//! Runs the pest parser of the selected prediction mode over the folded text,
//! then converts the resulting pairs into a [`RuleNode`] tree. Parse listeners
//! are fired as each rule node completes, in post-order, and may rewrite the
//! node's slot in its parent before the parent itself completes.

use pest::error::InputLocation;
use pest::iterators::Pair;
use pest::Parser;

use super::grammar::exhaustive::{self, ExhaustiveGrammar};
use super::grammar::optimistic::{self, OptimisticGrammar};
use super::grammar::{EntryPoint, GrammarRule, PredictionMode, RuleId, Symbol, TokenKind};
use super::reporter::SyntaxErrorReporter;
use super::stream::CaseInsensitiveStream;
use super::tree::{ParseListener, ParseTree, RuleNode, Token};
use super::Span;
use crate::errors::{SyntaxError, SyntaxErrorKind};

/// One recognizer per parse call; never shared between calls.
pub struct Recognizer<'s, 'a> {
    stream: &'s CaseInsensitiveStream<'a>,
    mode: PredictionMode,
    listeners: Vec<Box<dyn ParseListener + 's>>,
}

impl<'s, 'a> Recognizer<'s, 'a> {
    pub fn new(stream: &'s CaseInsensitiveStream<'a>) -> Self {
        Self {
            stream,
            mode: PredictionMode::Optimistic,
            listeners: Vec::new(),
        }
    }

    pub fn add_parse_listener(&mut self, listener: Box<dyn ParseListener + 's>) {
        self.listeners.push(listener);
    }

    pub fn prediction_mode(&self) -> PredictionMode {
        self.mode
    }

    pub fn set_prediction_mode(&mut self, mode: PredictionMode) {
        self.mode = mode;
    }

    /// Returns the recognizer to its initial state. Listeners stay attached.
    pub fn reset(&mut self) {
        self.mode = PredictionMode::Optimistic;
    }

    /// Recognizes the whole input from `entry` in the current prediction mode.
    pub fn recognize(&mut self, entry: EntryPoint) -> Result<RuleNode, SyntaxError> {
        match self.mode {
            PredictionMode::Optimistic => self.run::<OptimisticGrammar, optimistic::Rule>(entry),
            PredictionMode::Exhaustive => self.run::<ExhaustiveGrammar, exhaustive::Rule>(entry),
        }
    }

    /// Lexes the whole input, comments included (on the hidden channel).
    pub fn tokenize(&self) -> Result<Vec<Token>, SyntaxError> {
        let pairs = ExhaustiveGrammar::parse(exhaustive::Rule::token_stream, self.stream.folded())
            .map_err(|error| {
                let offset = match error.location {
                    InputLocation::Pos(pos) => pos,
                    InputLocation::Span((start, _)) => start,
                };
                SyntaxErrorReporter::new(self.stream)
                    .lexer_error(offset)
                    .with_cause(error)
            })?;

        let tokens = pairs
            .flatten()
            .filter_map(|pair| match pair.as_rule().symbol() {
                Some(Symbol::Token(kind)) if kind != TokenKind::Eof => {
                    let span = pair.as_span();
                    Some(Token::new(kind, span.start(), span.end(), self.stream))
                }
                _ => None,
            })
            .collect();
        Ok(tokens)
    }

    fn run<P, R>(&mut self, entry: EntryPoint) -> Result<RuleNode, SyntaxError>
    where
        P: Parser<R>,
        R: GrammarRule + Send + Sync + 'static,
    {
        let reporter = SyntaxErrorReporter::new(self.stream);
        let mut pairs = P::parse(R::entry(entry), self.stream.folded())
            .map_err(|error| reporter.recognition_error(error))?;

        let root = match pairs.next() {
            Some(pair) => pair,
            None => {
                return Err(reporter.positioned(
                    SyntaxErrorKind::Recognition,
                    "no viable alternative at input '<EOF>'",
                    Span::new(0, 0),
                ))
            }
        };
        let rule = match root.as_rule().symbol() {
            Some(Symbol::Rule(rule)) => rule,
            _ => match entry {
                EntryPoint::Statement => RuleId::SingleStatement,
                EntryPoint::Expression => RuleId::SingleExpression,
            },
        };
        self.build_rule(rule, root)
    }

    fn build_rule<R: GrammarRule>(
        &mut self,
        rule: RuleId,
        pair: Pair<'_, R>,
    ) -> Result<RuleNode, SyntaxError> {
        let mut node = RuleNode::new(rule, pair.as_span().into());
        self.build_children(&mut node, pair)?;
        Ok(node)
    }

    fn build_children<R: GrammarRule>(
        &mut self,
        node: &mut RuleNode,
        pair: Pair<'_, R>,
    ) -> Result<(), SyntaxError> {
        for inner in pair.into_inner() {
            match inner.as_rule().symbol() {
                Some(Symbol::Rule(rule)) => {
                    let child = self.build_rule(rule, inner)?;
                    node.add_child(ParseTree::Rule(child));
                    let index = node.child_count() - 1;
                    self.exit_rule(node, index)?;
                }
                // End of input is a grammar anchor, not part of the tree.
                Some(Symbol::Token(TokenKind::Eof)) => {}
                Some(Symbol::Token(kind)) => {
                    let span = inner.as_span();
                    let token = Token::new(kind, span.start(), span.end(), self.stream);
                    node.add_child(ParseTree::Terminal(token));
                }
                None => self.build_children(node, inner)?,
            }
        }
        Ok(())
    }

    fn exit_rule(&mut self, parent: &mut RuleNode, index: usize) -> Result<(), SyntaxError> {
        for listener in self.listeners.iter_mut() {
            listener.exit_rule(parent, index, self.stream)?;
        }
        Ok(())
    }
}
