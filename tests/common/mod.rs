//! Shared helpers for the integration tests.
#![allow(dead_code)]

use sqlfront::{
    parse_expression, parse_statement, ParseStrategy, ParsedTree, ParserConfig, RuleId,
    SqlParser, SyntaxError,
};

pub fn statement(sql: &str) -> ParsedTree {
    match parse_statement(sql) {
        Ok(tree) => tree,
        Err(e) => panic!("expected {sql:?} to parse, got: {e}"),
    }
}

pub fn expression(text: &str) -> ParsedTree {
    match parse_expression(text) {
        Ok(tree) => tree,
        Err(e) => panic!("expected {text:?} to parse, got: {e}"),
    }
}

pub fn statement_error(sql: &str) -> SyntaxError {
    match parse_statement(sql) {
        Ok(tree) => panic!("expected {sql:?} to fail, got: {}", tree.pretty()),
        Err(e) => e,
    }
}

pub fn expression_error(text: &str) -> SyntaxError {
    match parse_expression(text) {
        Ok(tree) => panic!("expected {text:?} to fail, got: {}", tree.pretty()),
        Err(e) => e,
    }
}

/// Parses with the exhaustive strategy only.
pub fn exhaustive_statement(sql: &str) -> ParsedTree {
    let parser = SqlParser::new(ParserConfig::default().with_strategy(ParseStrategy::Exhaustive));
    match parser.parse_statement(sql) {
        Ok(tree) => tree,
        Err(e) => panic!("expected {sql:?} to parse exhaustively, got: {e}"),
    }
}

pub fn count_rules(tree: &ParsedTree, rule: RuleId) -> usize {
    tree.root.find_all(rule).len()
}
