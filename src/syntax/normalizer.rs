//! Identifier and keyword rules the grammar cannot express on its own.
//!
//! Attached to the recognizer as a [`ParseListener`], the normalizer rewrites
//! each completed identifier-like node in its parent's child slot:
//!
//! - `quoted_identifier` becomes a plain `Identifier` token without the quotes;
//! - `non_reserved` (a keyword used as a name) becomes an `Identifier` token;
//! - `backquoted_identifier` and `digit_identifier` are rejected.
//!
//! A normalized tree contains none of those four node kinds, so running the
//! normalizer again changes nothing.

use super::grammar::{RuleId, TokenKind};
use super::reporter::SyntaxErrorReporter;
use super::stream::CaseInsensitiveStream;
use super::tree::{walk, ParseListener, ParseTree, RuleNode, Token};
use crate::errors::{SyntaxError, SyntaxErrorKind};

const BACKQUOTED_MESSAGE: &str =
    "backquoted identifiers not supported; please use double quotes instead";
const DIGIT_MESSAGE: &str = "identifiers must not start with a digit; please use double quotes";

#[derive(Debug, Default, Clone, Copy)]
pub struct TreeNormalizer;

impl TreeNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl ParseListener for TreeNormalizer {
    fn exit_rule(
        &mut self,
        parent: &mut RuleNode,
        index: usize,
        stream: &CaseInsensitiveStream<'_>,
    ) -> Result<(), SyntaxError> {
        let Some(ParseTree::Rule(node)) = parent.child(index) else {
            return Ok(());
        };
        let reporter = SyntaxErrorReporter::new(stream);

        let replacement = match node.rule() {
            RuleId::BackquotedIdentifier => {
                return Err(reporter
                    .positioned(SyntaxErrorKind::DisallowedIdentifier, BACKQUOTED_MESSAGE, node.span())
                    .with_help("write the identifier as \"name\""));
            }
            RuleId::DigitIdentifier => {
                return Err(reporter
                    .positioned(SyntaxErrorKind::DisallowedIdentifier, DIGIT_MESSAGE, node.span())
                    .with_help("write the identifier as \"name\""));
            }
            RuleId::QuotedIdentifier => {
                let token = single_token(node).ok_or_else(|| malformed(&reporter, node))?;
                let start = token.start + 1;
                let end = token.end.saturating_sub(1).max(start);
                token.derive(TokenKind::Identifier, start, end, stream)
            }
            RuleId::NonReserved => {
                let token = single_token(node).ok_or_else(|| malformed(&reporter, node))?;
                token.derive(TokenKind::Identifier, token.start, token.end, stream)
            }
            _ => return Ok(()),
        };

        parent.replace_child(index, ParseTree::Terminal(replacement));
        Ok(())
    }
}

/// The only child of `node`, when that child is a token.
fn single_token(node: &RuleNode) -> Option<Token> {
    match node.children() {
        [ParseTree::Terminal(token)] => Some(*token),
        _ => None,
    }
}

fn malformed(reporter: &SyntaxErrorReporter<'_, '_>, node: &RuleNode) -> SyntaxError {
    let nested = node
        .children()
        .iter()
        .find_map(ParseTree::as_rule)
        .map_or("<none>", |inner| inner.rule().name());
    reporter.positioned(
        SyntaxErrorKind::MalformedNonReserved,
        format!("nonReserved can only contain tokens. Found nested rule: {nested}"),
        node.span(),
    )
}

/// Re-runs normalization over an existing tree.
pub fn normalize(root: &mut RuleNode, stream: &CaseInsensitiveStream<'_>) -> Result<(), SyntaxError> {
    walk(root, &mut TreeNormalizer, stream)
}
