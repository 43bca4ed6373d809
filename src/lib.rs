//! sqlfront: the syntax front end of a SQL-like query language.
//!
//! Raw query text goes in; a validated, normalized parse tree (or whatever an
//! [`AstBuilder`] makes of it) comes out. Every failure is a [`SyntaxError`]
//! carrying the message and the position of the offending token.

pub use crate::ast::{AstBuilder, ParseTreeBuilder, ParsedTree};
pub use crate::config::{ConfigError, ParserConfig, TimeZone};
pub use crate::errors::{SyntaxError, SyntaxErrorKind};
pub use crate::parser::{parse_expression, parse_statement, tokenize, SqlParser};
pub use crate::syntax::{EntryPoint, ParseStrategy, PredictionMode, RuleId, Token, TokenKind};

pub mod ast;
pub mod cli;
pub mod config;
pub mod errors;
pub mod parser;
pub mod syntax;
