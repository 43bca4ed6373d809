//! The sqlfront command-line interface.
//!
//! Reads a statement or expression from the command line (or stdin), parses
//! it with the configured settings and prints the tree or the token listing.

use std::io::{self, Read};
use std::process;

use clap::Parser;

use crate::cli::args::{Command, SqlfrontArgs};
use crate::config::{ConfigError, ParserConfig};
use crate::parser::SqlParser;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() {
    let args = SqlfrontArgs::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };
    let parser = SqlParser::new(config);

    let outcome = match args.command {
        Command::Statement { sql } => read_input(sql).map(|text| {
            parser
                .parse_statement(&text)
                .map(|tree| output::print_tree(&tree, args.format))
        }),
        Command::Expression { expression } => read_input(expression).map(|text| {
            parser
                .parse_expression(&text)
                .map(|tree| output::print_tree(&tree, args.format))
        }),
        Command::Tokens { sql } => read_input(sql).map(|text| {
            parser
                .tokenize(&text)
                .map(|tokens| output::print_tokens(&tokens, &text, args.format))
        }),
    };

    match outcome {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) | Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
        Ok(Err(syntax_error)) => {
            output::print_error(syntax_error);
            process::exit(1);
        }
    }
}

/// Config file first, then command-line overrides.
fn resolve_config(args: &SqlfrontArgs) -> Result<ParserConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ParserConfig::from_file(path)?,
        None => ParserConfig::default(),
    };
    if let Some(time_zone) = args.time_zone {
        config.time_zone = time_zone;
    }
    if let Some(strategy) = args.strategy {
        config.strategy = strategy.into();
    }
    if let Some(depth) = args.max_depth {
        config.max_nesting_depth = depth;
    }
    Ok(config)
}

fn read_input(arg: Option<String>) -> io::Result<String> {
    match arg {
        Some(text) => Ok(text),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
