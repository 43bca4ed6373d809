//! Entry façade: statements, expressions and tokens.

use tracing::debug;

use crate::ast::{AstBuilder, ParseTreeBuilder, ParsedTree};
use crate::config::ParserConfig;
use crate::errors::SyntaxError;
use crate::syntax::{AdaptiveDriver, EntryPoint, SyntaxTree, Token};

/// Parses SQL text with a fixed configuration and AST builder.
///
/// Cheap to construct and immutable; every call builds its own stream,
/// recognizer and listeners, so one parser may be shared between threads when
/// its builder allows it.
#[derive(Debug, Clone, Default)]
pub struct SqlParser<B = ParseTreeBuilder> {
    config: ParserConfig,
    builder: B,
}

impl SqlParser<ParseTreeBuilder> {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            builder: ParseTreeBuilder,
        }
    }
}

impl<B: AstBuilder> SqlParser<B> {
    pub fn with_builder(config: ParserConfig, builder: B) -> Self {
        Self { config, builder }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse_statement(&self, sql: &str) -> Result<B::Statement, SyntaxError> {
        debug!(sql, "parsing statement");
        let tree = self.syntax_tree(EntryPoint::Statement, sql)?;
        self.builder
            .statement(&tree, &self.config.time_zone)
            .map_err(|error| attach_source(error, EntryPoint::Statement, sql))
    }

    pub fn parse_expression(&self, expression: &str) -> Result<B::Expression, SyntaxError> {
        debug!(expression, "parsing expression");
        let tree = self.syntax_tree(EntryPoint::Expression, expression)?;
        self.builder
            .expression(&tree, &self.config.time_zone)
            .map_err(|error| attach_source(error, EntryPoint::Expression, expression))
    }

    /// Every token of `sql`, comments included on the hidden channel.
    pub fn tokenize(&self, sql: &str) -> Result<Vec<Token>, SyntaxError> {
        debug!(sql, "tokenizing");
        self.driver()
            .tokenize(sql)
            .map_err(|error| attach_source(error, EntryPoint::Statement, sql))
    }

    fn syntax_tree<'a>(&self, entry: EntryPoint, text: &'a str) -> Result<SyntaxTree<'a>, SyntaxError> {
        self.driver()
            .parse(entry, text)
            .map_err(|error| attach_source(error, entry, text))
    }

    fn driver(&self) -> AdaptiveDriver {
        AdaptiveDriver::new(self.config.strategy, self.config.max_nesting_depth)
    }
}

fn attach_source(error: SyntaxError, entry: EntryPoint, text: &str) -> SyntaxError {
    error.with_source_code(entry.name(), text)
}

/// Parses one statement with the default configuration.
pub fn parse_statement(sql: &str) -> Result<ParsedTree, SyntaxError> {
    SqlParser::new(ParserConfig::default()).parse_statement(sql)
}

/// Parses one expression with the default configuration.
pub fn parse_expression(expression: &str) -> Result<ParsedTree, SyntaxError> {
    SqlParser::new(ParserConfig::default()).parse_expression(expression)
}

/// Tokenizes with the default configuration.
pub fn tokenize(sql: &str) -> Result<Vec<Token>, SyntaxError> {
    SqlParser::new(ParserConfig::default()).tokenize(sql)
}
