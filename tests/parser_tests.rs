// tests/parser_tests.rs

mod common;

use common::{count_rules, expression, expression_error, statement, statement_error};
use sqlfront::syntax::Channel;
use sqlfront::{
    tokenize, EntryPoint, ParserConfig, RuleId, SqlParser, SyntaxErrorKind, TimeZone, TokenKind,
};

// ---
// Statements
// ---

#[test]
fn test_parse_simple_select() {
    let tree = statement("SELECT a FROM t");
    assert_eq!(tree.entry, EntryPoint::Statement);
    assert_eq!(tree.root.rule(), RuleId::SingleStatement);
    assert_eq!(tree.identifiers(), vec!["a", "t"]);
    assert_eq!(count_rules(&tree, RuleId::QuerySpecification), 1);
    assert_eq!(count_rules(&tree, RuleId::FromClause), 1);
}

#[test]
fn test_keywords_are_case_insensitive() {
    let upper = statement("SELECT a FROM t");
    let lower = statement("select a from t");
    let mixed = statement("SeLeCt a FrOm t");
    assert_eq!(upper.root, lower.root);
    assert_eq!(upper.root, mixed.root);
}

#[test]
fn test_identifier_text_keeps_original_case() {
    let tree = statement("select MyCol from MyTable");
    assert_eq!(tree.identifiers(), vec!["MyCol", "MyTable"]);
}

#[test]
fn test_pretty_prints_original_text() {
    let tree = expression("a");
    assert_eq!(
        tree.pretty(),
        "(single_expression (expression (boolean_expression (boolean_term (predicated \
         (value_expression (additive_expression (multiplicative_expression \
         (column_reference (identifier (unquoted_identifier a)))))))))))"
    );
    assert_eq!(tree.to_string(), tree.pretty());
}

#[test]
fn test_parse_full_query() {
    let tree = statement(
        "SELECT DISTINCT a, COUNT(*) AS n FROM emp e \
         WHERE salary > 1000 AND name LIKE 'A%' \
         GROUP BY a HAVING COUNT(*) > 1 \
         ORDER BY n DESC LIMIT 10",
    );
    assert_eq!(count_rules(&tree, RuleId::SetQuantifier), 1);
    assert_eq!(count_rules(&tree, RuleId::FunctionCall), 2);
    assert_eq!(count_rules(&tree, RuleId::GroupBy), 1);
    assert_eq!(count_rules(&tree, RuleId::OrderBy), 1);
    assert_eq!(count_rules(&tree, RuleId::Pattern), 1);
}

#[test]
fn test_parse_with_clause_and_joins() {
    let tree = statement(
        "WITH q AS (SELECT id FROM a) \
         SELECT * FROM q LEFT OUTER JOIN b ON q.id = b.id JOIN c USING (id)",
    );
    assert_eq!(count_rules(&tree, RuleId::NamedQuery), 1);
    assert_eq!(count_rules(&tree, RuleId::JoinRelation), 2);
    assert_eq!(count_rules(&tree, RuleId::JoinCriteria), 2);
}

#[test]
fn test_parse_in_list_and_in_subquery() {
    let list = statement("SELECT a FROM t WHERE b IN (1, 2, 3)");
    assert_eq!(count_rules(&list, RuleId::Predicate), 1);
    assert_eq!(count_rules(&list, RuleId::Query), 1);

    let sub = statement("SELECT a FROM t WHERE b NOT IN (SELECT c FROM u)");
    assert_eq!(count_rules(&sub, RuleId::Predicate), 1);
    assert_eq!(count_rules(&sub, RuleId::Query), 2);
}

#[test]
fn test_parse_table_pattern() {
    let tree = statement("SELECT * FROM emp*");
    assert!(tree
        .tokens()
        .iter()
        .any(|token| token.kind == TokenKind::TableIdentifier && tree.token_text(token) == "emp*"));
}

#[test]
fn test_parse_show_and_describe() {
    let tables = statement("SHOW TABLES LIKE 'emp%'");
    assert_eq!(count_rules(&tables, RuleId::ShowTables), 1);

    let columns = statement("SHOW COLUMNS FROM emp");
    assert_eq!(count_rules(&columns, RuleId::ShowColumns), 1);
    assert_eq!(columns.identifiers(), vec!["emp"]);

    assert_eq!(count_rules(&statement("show functions"), RuleId::ShowFunctions), 1);
    assert_eq!(count_rules(&statement("SHOW SCHEMAS"), RuleId::ShowSchemas), 1);
    assert_eq!(count_rules(&statement("DESCRIBE emp"), RuleId::Describe), 1);
    assert_eq!(count_rules(&statement("DESC emp"), RuleId::Describe), 1);
}

#[test]
fn test_parse_explain_and_debug() {
    let plain = statement("EXPLAIN SELECT 1");
    assert_eq!(count_rules(&plain, RuleId::Explain), 1);
    assert_eq!(count_rules(&plain, RuleId::ExplainOptions), 0);

    let options = statement("EXPLAIN (PLAN PARSED FORMAT TEXT VERIFY false) SELECT 1");
    assert_eq!(count_rules(&options, RuleId::ExplainOption), 3);

    let nested = statement("EXPLAIN DEBUG (PLAN OPTIMIZED) SELECT 1");
    assert_eq!(count_rules(&nested, RuleId::Explain), 1);
    assert_eq!(count_rules(&nested, RuleId::DebugOption), 1);
}

// ---
// Identifier normalization
// ---

#[test]
fn test_quoted_identifier_is_unwrapped() {
    let tree = expression("\"abc\"");
    assert_eq!(tree.identifiers(), vec!["abc"]);
    assert_eq!(count_rules(&tree, RuleId::QuotedIdentifier), 0);
    assert!(tree.pretty().contains("(identifier abc)"));
}

#[test]
fn test_quoted_identifier_may_hold_keywords_and_spaces() {
    let tree = statement("SELECT \"select\", \"My Column\" FROM \"from\"");
    assert_eq!(tree.identifiers(), vec!["select", "My Column", "from"]);
}

#[test]
fn test_non_reserved_keywords_are_identifiers() {
    let tree = statement("SELECT plan, type FROM tables");
    assert_eq!(tree.identifiers(), vec!["plan", "type", "tables"]);
    assert_eq!(count_rules(&tree, RuleId::NonReserved), 0);
}

#[test]
fn test_backquoted_identifier_is_rejected() {
    let error = expression_error("`abc`");
    assert_eq!(error.kind(), SyntaxErrorKind::DisallowedIdentifier);
    assert_eq!(
        error.message(),
        "backquoted identifiers not supported; please use double quotes instead"
    );
    assert_eq!((error.line(), error.column()), (1, 0));
}

#[test]
fn test_digit_identifier_is_rejected() {
    let error = statement_error("SELECT 1abc FROM t");
    assert_eq!(error.kind(), SyntaxErrorKind::DisallowedIdentifier);
    assert_eq!(
        error.message(),
        "identifiers must not start with a digit; please use double quotes"
    );
    assert_eq!((error.line(), error.column()), (1, 7));
}

#[test]
fn test_numbers_are_not_digit_identifiers() {
    let tree = expression("1 + 2.5 * 3e2");
    assert_eq!(count_rules(&tree, RuleId::IntegerLiteral), 1);
    assert_eq!(count_rules(&tree, RuleId::DecimalLiteral), 2);
}

// ---
// Expressions
// ---

#[test]
fn test_parse_expression_entry() {
    let tree = expression("a + 1 > 2 AND NOT b IS NULL");
    assert_eq!(tree.entry, EntryPoint::Expression);
    assert_eq!(tree.root.rule(), RuleId::SingleExpression);
    assert_eq!(count_rules(&tree, RuleId::LogicalNot), 1);
    assert_eq!(count_rules(&tree, RuleId::ComparisonOperator), 1);
}

#[test]
fn test_parse_cast_and_extract() {
    let tree = expression("CAST(a AS integer) + EXTRACT(year FROM b)");
    assert_eq!(count_rules(&tree, RuleId::Cast), 1);
    assert_eq!(count_rules(&tree, RuleId::Extract), 1);
}

#[test]
fn test_expression_rejects_trailing_statement() {
    let error = expression_error("a FROM t");
    assert_eq!(error.kind(), SyntaxErrorKind::Recognition);
    assert_eq!((error.line(), error.column()), (1, 2));
}

// ---
// Errors
// ---

#[test]
fn test_missing_select_list_points_at_from() {
    let error = statement_error("SELECT FROM");
    assert_eq!(error.kind(), SyntaxErrorKind::Recognition);
    assert_eq!((error.line(), error.column()), (1, 7));
    assert_eq!(
        error.message(),
        "mismatched input 'FROM' expecting {'ALL', 'DISTINCT', expression}"
    );
}

#[test]
fn test_expected_sets_name_tokens_not_rules() {
    for sql in ["SELECT FROM", "SELECT a FROM t WHERE", "SELECT a FROM", "SELECT a FROM t JOIN u ON"] {
        let message = statement_error(sql).message().to_string();
        for rule in ["boolean_term", "set_quantifier", "value_expression", "table_name", "relation_primary"] {
            assert!(!message.contains(rule), "{sql:?}: {message}");
        }
    }
}

#[test]
fn test_error_position_on_later_line() {
    let error = statement_error("SELECT a\nFROM\nWHERE");
    assert_eq!((error.line(), error.column()), (3, 0));
    assert!(error.message().contains("'WHERE'"), "{}", error.message());
}

#[test]
fn test_unexpected_end_of_input() {
    let error = statement_error("SELECT a FROM t WHERE");
    assert_eq!((error.line(), error.column()), (1, 21));
    assert!(error.message().contains("'<EOF>'"), "{}", error.message());
}

#[test]
fn test_unknown_character() {
    let error = statement_error("SELECT * FROM t #");
    assert_eq!(error.message(), "token recognition error at: '#'");
    assert_eq!((error.line(), error.column()), (1, 16));
}

#[test]
fn test_error_display_includes_position() {
    let error = statement_error("SELECT FROM");
    assert!(error.to_string().starts_with("line 1:7: "));
}

// ---
// Configuration and tokens
// ---

#[test]
fn test_time_zone_is_passed_through() {
    let time_zone: TimeZone = "+02:00".parse().unwrap();
    let parser = SqlParser::new(ParserConfig::default().with_time_zone(time_zone));
    let tree = parser.parse_statement("SELECT 1").unwrap();
    assert_eq!(tree.time_zone, time_zone);
    assert_eq!(tree.time_zone.offset_seconds(), 7200);
}

#[test]
fn test_tokenize_keeps_comments_hidden() {
    let source = "SELECT a /* c */ FROM t -- end";
    let tokens = tokenize(source).unwrap();
    let kinds: Vec<_> = tokens.iter().map(|token| token.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Select,
            TokenKind::Identifier,
            TokenKind::BracketedComment,
            TokenKind::From,
            TokenKind::Identifier,
            TokenKind::SimpleComment,
        ]
    );
    let hidden: Vec<_> = tokens
        .iter()
        .filter(|token| token.channel == Channel::Hidden)
        .map(|token| &source[token.start..token.end])
        .collect();
    assert_eq!(hidden, vec!["/* c */", "-- end"]);
}

#[test]
fn test_comments_are_ignored_by_the_parser() {
    let plain = statement("SELECT a FROM t");
    let commented = statement("SELECT /* all */ a -- pick a\nFROM t");
    assert_eq!(plain.identifiers(), commented.identifiers());
}
