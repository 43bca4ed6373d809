//! User-facing output for the CLI.
//!
//! Trees print as S-expressions or JSON; token listings are colorized when
//! stdout is a terminal. Errors are rendered through miette.

use std::io::{self, Write};

use miette::Report;
use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::ast::ParsedTree;
use crate::cli::args::OutputFormat;
use crate::errors::SyntaxError;
use crate::syntax::{Channel, Token, TokenKind};

// ============================================================================
// TREES
// ============================================================================

pub fn print_tree(tree: &ParsedTree, format: OutputFormat) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    match format {
        OutputFormat::Tree => writeln!(stdout, "{}", tree.pretty()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(tree).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            writeln!(stdout, "{json}")
        }
    }
}

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Serialize)]
struct TokenRecord<'a> {
    kind: TokenKind,
    channel: Channel,
    text: &'a str,
    line: usize,
    column: usize,
    start: usize,
    end: usize,
}

pub fn print_tokens(tokens: &[Token], source: &str, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            let records: Vec<_> = tokens
                .iter()
                .map(|token| TokenRecord {
                    kind: token.kind,
                    channel: token.channel,
                    text: token_text(token, source),
                    line: token.line,
                    column: token.column,
                    start: token.start,
                    end: token.end,
                })
                .collect();
            let json = serde_json::to_string_pretty(&records).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
            writeln!(io::stdout().lock(), "{json}")
        }
        OutputFormat::Tree => {
            let choice = if atty::is(atty::Stream::Stdout) {
                ColorChoice::Auto
            } else {
                ColorChoice::Never
            };
            let mut stdout = StandardStream::stdout(choice);
            for token in tokens {
                write!(stdout, "{:>4}:{:<4} ", token.line, token.column)?;
                stdout.set_color(&token_color(token))?;
                write!(stdout, "{:<20}", token.kind.display_name())?;
                stdout.reset()?;
                writeln!(stdout, " {}", token_text(token, source))?;
            }
            Ok(())
        }
    }
}

/// Renders a syntax error with its source snippet on stderr.
pub fn print_error(error: SyntaxError) {
    let report = Report::new(error);
    eprintln!("{report:?}");
}

// ============================================================================
// PRIVATE HELPERS
// ============================================================================

fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
    source.get(token.start..token.end).unwrap_or("")
}

fn token_color(token: &Token) -> ColorSpec {
    let mut spec = ColorSpec::new();
    if token.channel == Channel::Hidden {
        spec.set_dimmed(true);
        return spec;
    }
    match token.kind {
        TokenKind::Identifier
        | TokenKind::QuotedIdentifier
        | TokenKind::BackquotedIdentifier
        | TokenKind::DigitIdentifier
        | TokenKind::TableIdentifier => spec.set_fg(Some(Color::Green)),
        TokenKind::String | TokenKind::IntegerValue | TokenKind::DecimalValue => {
            spec.set_fg(Some(Color::Yellow))
        }
        kind if kind.is_keyword() => spec.set_fg(Some(Color::Blue)).set_bold(true),
        _ => spec.set_fg(None),
    };
    spec
}
