//! Concrete parse tree produced by the recognizer.
//!
//! A tree is made of [`RuleNode`]s (one per visible grammar rule) whose
//! children are either nested rule nodes or [`Token`] terminals. Tokens carry
//! byte offsets into the source and the line/column of their first character;
//! their text is always read back from the original, case-preserving input.

use serde::Serialize;

use super::grammar::{RuleId, TokenKind};
use super::stream::CaseInsensitiveStream;
use super::Span;
use crate::errors::SyntaxError;

/// Channel a token is emitted on. Hidden tokens never reach the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Default,
    Hidden,
}

/// A lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub channel: Channel,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
    /// 1-based.
    pub line: usize,
    /// 0-based, in characters.
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize, stream: &CaseInsensitiveStream<'_>) -> Self {
        let (line, column) = stream.position(start);
        let channel = if kind.is_comment() {
            Channel::Hidden
        } else {
            Channel::Default
        };
        Self {
            kind,
            channel,
            start,
            end,
            line,
            column,
        }
    }

    /// Builds a token of another kind over a sub-range of this one.
    ///
    /// The channel is inherited; line and column are recomputed for the new start.
    pub fn derive(
        &self,
        kind: TokenKind,
        start: usize,
        end: usize,
        stream: &CaseInsensitiveStream<'_>,
    ) -> Self {
        let (line, column) = stream.position(start);
        Self {
            kind,
            channel: self.channel,
            start,
            end,
            line,
            column,
        }
    }

    /// Original (case-preserving) text of the token.
    pub fn text<'a>(&self, stream: &CaseInsensitiveStream<'a>) -> &'a str {
        stream.text(self.start, self.end)
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// A node of the concrete parse tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParseTree {
    Terminal(Token),
    Rule(RuleNode),
}

impl ParseTree {
    pub fn span(&self) -> Span {
        match self {
            ParseTree::Terminal(token) => token.span(),
            ParseTree::Rule(node) => node.span(),
        }
    }

    pub fn as_rule(&self) -> Option<&RuleNode> {
        match self {
            ParseTree::Rule(node) => Some(node),
            ParseTree::Terminal(_) => None,
        }
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            ParseTree::Terminal(token) => Some(token),
            ParseTree::Rule(_) => None,
        }
    }
}

/// Interior node: one visible grammar rule and what it matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleNode {
    rule: RuleId,
    span: Span,
    children: Vec<ParseTree>,
}

impl RuleNode {
    pub fn new(rule: RuleId, span: Span) -> Self {
        Self {
            rule,
            span,
            children: Vec::new(),
        }
    }

    pub fn rule(&self) -> RuleId {
        self.rule
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[ParseTree] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&ParseTree> {
        self.children.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn add_child(&mut self, child: ParseTree) {
        self.children.push(child);
    }

    /// Replaces the child at `index`, returning the previous one.
    ///
    /// Out-of-range indices leave the node untouched and hand `tree` back.
    pub fn replace_child(&mut self, index: usize, tree: ParseTree) -> ParseTree {
        match self.children.get_mut(index) {
            Some(slot) => std::mem::replace(slot, tree),
            None => tree,
        }
    }

    /// All tokens below this node, in source order.
    pub fn terminals(&self) -> Vec<Token> {
        let mut out = Vec::new();
        collect_terminals(self, &mut out);
        out
    }

    /// All nodes of `rule` below (and including) this node, pre-order.
    pub fn find_all(&self, rule: RuleId) -> Vec<&RuleNode> {
        let mut out = Vec::new();
        collect_rules(self, rule, &mut out);
        out
    }
}

fn collect_terminals(node: &RuleNode, out: &mut Vec<Token>) {
    for child in &node.children {
        match child {
            ParseTree::Terminal(token) => out.push(*token),
            ParseTree::Rule(inner) => collect_terminals(inner, out),
        }
    }
}

fn collect_rules<'t>(node: &'t RuleNode, rule: RuleId, out: &mut Vec<&'t RuleNode>) {
    if node.rule == rule {
        out.push(node);
    }
    for child in &node.children {
        if let ParseTree::Rule(inner) = child {
            collect_rules(inner, rule, out);
        }
    }
}

// ============================================================================
// LISTENERS
// ============================================================================

/// Callback fired each time a rule node has been fully built.
///
/// `parent.child(index)` is the rule that just completed. Listeners may
/// replace that slot in place; any error aborts the parse.
pub trait ParseListener {
    fn exit_rule(
        &mut self,
        parent: &mut RuleNode,
        index: usize,
        stream: &CaseInsensitiveStream<'_>,
    ) -> Result<(), SyntaxError>;
}

/// Replays rule exits over an already built tree, children before parents.
pub fn walk<L: ParseListener + ?Sized>(
    root: &mut RuleNode,
    listener: &mut L,
    stream: &CaseInsensitiveStream<'_>,
) -> Result<(), SyntaxError> {
    for index in 0..root.children.len() {
        if let Some(ParseTree::Rule(child)) = root.children.get_mut(index) {
            walk(child, listener, stream)?;
            listener.exit_rule(root, index, stream)?;
        }
    }
    Ok(())
}
