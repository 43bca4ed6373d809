//! Command-line arguments and subcommands for the sqlfront CLI.
//!
//! Built with `clap`'s derive API. Parser options are global so they can be
//! given before or after the subcommand.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::TimeZone;
use crate::syntax::{ParseStrategy, MAX_NESTING_DEPTH};

#[derive(Debug, Parser)]
#[command(
    name = "sqlfront",
    version,
    about = "Parse SQL statements and expressions into normalized syntax trees."
)]
pub struct SqlfrontArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Tree)]
    pub format: OutputFormat,

    /// Session time zone handed to the AST builder (UTC, Z, +HH:MM or +HHMM).
    #[arg(long, global = true)]
    pub time_zone: Option<TimeZone>,

    /// Prediction strategy.
    #[arg(long, global = true, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Maximum nesting depth accepted before parsing (0 to 64).
    #[arg(
        long,
        global = true,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(0..=MAX_NESTING_DEPTH as u64)
    )]
    pub max_depth: Option<usize>,

    /// YAML or JSON file with parser settings; flags override it.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a single statement.
    Statement {
        /// The statement text; read from stdin when omitted.
        sql: Option<String>,
    },
    /// Parse a single expression.
    Expression {
        /// The expression text; read from stdin when omitted.
        expression: Option<String>,
    },
    /// List the tokens of a statement, comments included.
    Tokens {
        /// The text to tokenize; read from stdin when omitted.
        sql: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// S-expression tree, or a colored token listing.
    Tree,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Adaptive,
    Exhaustive,
}

impl From<StrategyArg> for ParseStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Adaptive => ParseStrategy::Adaptive,
            StrategyArg::Exhaustive => ParseStrategy::Exhaustive,
        }
    }
}
