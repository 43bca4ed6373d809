//! The AST builder seam.
//!
//! The front end stops at a normalized parse tree. Whatever semantic layer
//! sits on top plugs in through [`AstBuilder`], which receives the tree and the
//! caller's time zone. [`ParseTreeBuilder`] is the default: it hands back an
//! owned copy of the tree, which is what the CLI and the tests work with.

use std::fmt;

use serde::Serialize;

use crate::config::TimeZone;
use crate::errors::SyntaxError;
use crate::syntax::{EntryPoint, ParseTree, RuleNode, SyntaxTree, Token, TokenKind};

/// Turns a normalized syntax tree into the caller's statement and expression types.
pub trait AstBuilder {
    type Statement;
    type Expression;

    fn statement(
        &self,
        tree: &SyntaxTree<'_>,
        time_zone: &TimeZone,
    ) -> Result<Self::Statement, SyntaxError>;

    fn expression(
        &self,
        tree: &SyntaxTree<'_>,
        time_zone: &TimeZone,
    ) -> Result<Self::Expression, SyntaxError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ParseTreeBuilder;

impl ParseTreeBuilder {
    fn build(tree: &SyntaxTree<'_>, time_zone: &TimeZone) -> ParsedTree {
        ParsedTree {
            entry: tree.entry,
            source: tree.source().to_string(),
            time_zone: *time_zone,
            root: tree.root.clone(),
        }
    }
}

impl AstBuilder for ParseTreeBuilder {
    type Statement = ParsedTree;
    type Expression = ParsedTree;

    fn statement(&self, tree: &SyntaxTree<'_>, time_zone: &TimeZone) -> Result<ParsedTree, SyntaxError> {
        Ok(Self::build(tree, time_zone))
    }

    fn expression(&self, tree: &SyntaxTree<'_>, time_zone: &TimeZone) -> Result<ParsedTree, SyntaxError> {
        Ok(Self::build(tree, time_zone))
    }
}

/// An owned, normalized parse tree with the text it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedTree {
    pub entry: EntryPoint,
    pub source: String,
    pub time_zone: TimeZone,
    pub root: RuleNode,
}

impl ParsedTree {
    pub fn token_text(&self, token: &Token) -> &str {
        self.source.get(token.start..token.end).unwrap_or("")
    }

    /// Text of every identifier, in source order.
    pub fn identifiers(&self) -> Vec<&str> {
        self.root
            .terminals()
            .iter()
            .filter(|token| token.kind == TokenKind::Identifier)
            .map(|token| self.token_text(token))
            .collect()
    }

    pub fn tokens(&self) -> Vec<Token> {
        self.root.terminals()
    }

    /// S-expression rendering: `(rule child ...)`, tokens as their original text.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_node(&self.root, &mut out);
        out
    }

    fn write_node(&self, node: &RuleNode, out: &mut String) {
        out.push('(');
        out.push_str(node.rule().name());
        for child in node.children() {
            out.push(' ');
            match child {
                ParseTree::Rule(inner) => self.write_node(inner, out),
                ParseTree::Terminal(token) => out.push_str(self.token_text(token)),
            }
        }
        out.push(')');
    }
}

impl fmt::Display for ParsedTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty())
    }
}
