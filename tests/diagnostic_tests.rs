//! Diagnostic output of syntax errors.
//!
//! Errors returned by the public entry points carry their source text, so
//! miette can render them with a labelled snippet. These tests render with a
//! colorless theme and check the pieces a user relies on.

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme};
use sqlfront::{parse_expression, parse_statement, SyntaxError};

/// Test helper to capture the rendered report as a string.
fn render(error: &SyntaxError) -> String {
    let handler =
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor()).with_width(200);
    let mut out = String::new();
    handler
        .render_report(&mut out, error)
        .expect("rendering into a String cannot fail");
    out
}

#[test]
fn test_recognition_error_diagnostic() {
    let error = parse_statement("SELECT FROM").unwrap_err();
    let code = error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("sqlfront::syntax::recognition"));

    let output = render(&error);
    assert!(output.contains("sqlfront::syntax::recognition"), "{output}");
    assert!(output.contains("SELECT FROM"), "{output}");
    assert!(output.contains("input 'FROM'"), "{output}");
}

#[test]
fn test_label_covers_offending_token() {
    let error = parse_statement("SELECT FROM").unwrap_err();
    let labels: Vec<_> = error.labels().into_iter().flatten().collect();
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].offset(), 7);
    assert_eq!(labels[0].len(), 4);
}

#[test]
fn test_end_of_input_label_is_not_empty() {
    let error = parse_statement("SELECT a FROM").unwrap_err();
    let labels: Vec<_> = error.labels().into_iter().flatten().collect();
    assert_eq!(labels[0].offset(), 13);
    assert_eq!(labels[0].len(), 1);
}

#[test]
fn test_disallowed_identifier_has_help() {
    let error = parse_expression("`abc`").unwrap_err();
    let code = error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("sqlfront::syntax::disallowed-identifier"));
    assert!(error.help().is_some());

    let output = render(&error);
    assert!(output.contains("`abc`"), "{output}");
    assert!(output.contains("double quotes"), "{output}");
}

#[test]
fn test_too_large_diagnostic() {
    let sql = format!("SELECT {}", "(".repeat(100));
    let error = parse_statement(&sql).unwrap_err();
    let code = error.code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("sqlfront::syntax::too-large"));
    assert_eq!(
        error.message(),
        "statement is too large (maximum nesting depth of 64 exceeded)"
    );
    assert!(render(&error).contains("too large"));
}

#[test]
fn test_recognition_error_keeps_its_cause() {
    let error = parse_statement("SELECT FROM").unwrap_err();
    assert!(std::error::Error::source(&error).is_some());
}
