//! Grammar bindings for the pest-generated recognizers.
//!
//! Both prediction modes are generated from the same base grammar plus one
//! mode-specific file, so each mode gets its own `Rule` enum. The
//! [`grammar_symbols!`] table below is the single place that maps those enums
//! onto the crate's own [`RuleId`] and [`TokenKind`] vocabularies.

use std::fmt;

use serde::{Deserialize, Serialize};

pub(crate) mod optimistic {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "syntax/grammar/base.pest"]
    #[grammar = "syntax/grammar/optimistic.pest"]
    pub struct OptimisticGrammar;
}

pub(crate) mod exhaustive {
    use pest_derive::Parser;

    #[derive(Parser)]
    #[grammar = "syntax/grammar/base.pest"]
    #[grammar = "syntax/grammar/exhaustive.pest"]
    pub struct ExhaustiveGrammar;
}

// ============================================================================
// ENTRY POINTS AND MODES
// ============================================================================

/// Grammar entry point a parse starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    Statement,
    Expression,
}

impl EntryPoint {
    /// Name used in log lines and in "too large" errors.
    pub fn name(self) -> &'static str {
        match self {
            EntryPoint::Statement => "statement",
            EntryPoint::Expression => "expression",
        }
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Prediction strategy used by the recognizer for one attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMode {
    /// Commits at every prediction point after a bounded lookahead.
    Optimistic,
    /// Backtracks through every alternative at every prediction point.
    Exhaustive,
}

impl fmt::Display for PredictionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PredictionMode::Optimistic => f.write_str("optimistic"),
            PredictionMode::Exhaustive => f.write_str("exhaustive"),
        }
    }
}

/// A visible grammar symbol: either a rule node or a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    Rule(RuleId),
    Token(TokenKind),
}

/// Implemented by the generated `Rule` enum of each prediction mode.
pub(crate) trait GrammarRule: pest::RuleType {
    /// Maps a generated rule onto the shared vocabulary; `None` for hidden rules.
    fn symbol(self) -> Option<Symbol>;

    fn entry(point: EntryPoint) -> Self;
}

macro_rules! grammar_symbols {
    (
        rules { $($rule:ident => $rule_id:ident),* $(,)? }
        tokens { $($token:ident => $kind:ident : $display:literal),* $(,)? }
    ) => {
        /// Identity of a rule node in the parse tree.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum RuleId {
            $($rule_id,)*
        }

        impl RuleId {
            /// The grammar name of this rule.
            pub fn name(self) -> &'static str {
                match self {
                    $(RuleId::$rule_id => stringify!($rule),)*
                }
            }
        }

        /// Lexical category of a token.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum TokenKind {
            $($kind,)*
            Eof,
        }

        impl TokenKind {
            /// How the token is spelled in error messages.
            pub fn display_name(self) -> &'static str {
                match self {
                    $(TokenKind::$kind => $display,)*
                    TokenKind::Eof => "<EOF>",
                }
            }
        }

        impl GrammarRule for optimistic::Rule {
            fn symbol(self) -> Option<Symbol> {
                match self {
                    $(Self::$rule => Some(Symbol::Rule(RuleId::$rule_id)),)*
                    $(Self::$token => Some(Symbol::Token(TokenKind::$kind)),)*
                    Self::EOI => Some(Symbol::Token(TokenKind::Eof)),
                    _ => None,
                }
            }

            fn entry(point: EntryPoint) -> Self {
                match point {
                    EntryPoint::Statement => Self::single_statement,
                    EntryPoint::Expression => Self::single_expression,
                }
            }
        }

        impl GrammarRule for exhaustive::Rule {
            fn symbol(self) -> Option<Symbol> {
                match self {
                    $(Self::$rule => Some(Symbol::Rule(RuleId::$rule_id)),)*
                    $(Self::$token => Some(Symbol::Token(TokenKind::$kind)),)*
                    Self::EOI => Some(Symbol::Token(TokenKind::Eof)),
                    _ => None,
                }
            }

            fn entry(point: EntryPoint) -> Self {
                match point {
                    EntryPoint::Statement => Self::single_statement,
                    EntryPoint::Expression => Self::single_expression,
                }
            }
        }
    };
}

grammar_symbols! {
    rules {
        single_statement => SingleStatement,
        single_expression => SingleExpression,
        statement_default => StatementDefault,
        explain => Explain,
        explain_options => ExplainOptions,
        explain_option => ExplainOption,
        debug => Debug,
        debug_options => DebugOptions,
        debug_option => DebugOption,
        show_tables => ShowTables,
        show_columns => ShowColumns,
        show_functions => ShowFunctions,
        show_schemas => ShowSchemas,
        describe => Describe,
        query => Query,
        named_query => NamedQuery,
        query_no_with => QueryNoWith,
        subquery => Subquery,
        order_by => OrderBy,
        query_specification => QuerySpecification,
        group_by => GroupBy,
        grouping_element => GroupingElement,
        set_quantifier => SetQuantifier,
        select_item => SelectItem,
        from_clause => FromClause,
        relation => Relation,
        join_relation => JoinRelation,
        join_type => JoinType,
        join_criteria => JoinCriteria,
        table_name => TableName,
        aliased_query => AliasedQuery,
        aliased_relation => AliasedRelation,
        table_identifier => TableIdentifier,
        expression => Expression,
        boolean_expression => BooleanExpression,
        boolean_term => BooleanTerm,
        logical_not => LogicalNot,
        exists => Exists,
        string_query => StringQuery,
        match_query => MatchQuery,
        multi_match_query => MultiMatchQuery,
        predicated => Predicated,
        predicate => Predicate,
        pattern => Pattern,
        string => StringValue,
        value_expression => ValueExpression,
        additive_expression => AdditiveExpression,
        multiplicative_expression => MultiplicativeExpression,
        arithmetic_unary => ArithmeticUnary,
        comparison_operator => ComparisonOperator,
        cast => Cast,
        extract => Extract,
        star => Star,
        function_call => FunctionCall,
        subquery_expression => SubqueryExpression,
        parenthesized_expression => ParenthesizedExpression,
        dereference => Dereference,
        column_reference => ColumnReference,
        null_literal => NullLiteral,
        boolean_literal => BooleanLiteral,
        numeric_literal => NumericLiteral,
        decimal_literal => DecimalLiteral,
        integer_literal => IntegerLiteral,
        string_literal => StringLiteral,
        param_literal => ParamLiteral,
        boolean_value => BooleanValue,
        data_type => DataType,
        qualified_name => QualifiedName,
        identifier => Identifier,
        quoted_identifier => QuotedIdentifier,
        backquoted_identifier => BackquotedIdentifier,
        unquoted_identifier => UnquotedIdentifier,
        digit_identifier => DigitIdentifier,
        non_reserved => NonReserved,
    }
    tokens {
        IDENTIFIER => Identifier: "IDENTIFIER",
        QUOTED_IDENTIFIER => QuotedIdentifier: "QUOTED_IDENTIFIER",
        BACKQUOTED_IDENTIFIER => BackquotedIdentifier: "BACKQUOTED_IDENTIFIER",
        DIGIT_IDENTIFIER => DigitIdentifier: "DIGIT_IDENTIFIER",
        TABLE_IDENTIFIER => TableIdentifier: "TABLE_IDENTIFIER",
        STRING => String: "STRING",
        INTEGER_VALUE => IntegerValue: "INTEGER_VALUE",
        DECIMAL_VALUE => DecimalValue: "DECIMAL_VALUE",
        SIMPLE_COMMENT => SimpleComment: "SIMPLE_COMMENT",
        BRACKETED_COMMENT => BracketedComment: "BRACKETED_COMMENT",
        LEFT_PAREN => LeftParen: "'('",
        RIGHT_PAREN => RightParen: "')'",
        COMMA => Comma: "','",
        DOT => Dot: "'.'",
        ASTERISK => Asterisk: "'*'",
        SLASH => Slash: "'/'",
        PERCENT => Percent: "'%'",
        PLUS => Plus: "'+'",
        MINUS => Minus: "'-'",
        EQ => Eq: "'='",
        NEQ => Neq: "'<>'",
        LT => Lt: "'<'",
        LTE => Lte: "'<='",
        GT => Gt: "'>'",
        GTE => Gte: "'>='",
        PARAM => Param: "'?'",
        ALL => All: "'ALL'",
        ANALYZE => Analyze: "'ANALYZE'",
        ANALYZED => Analyzed: "'ANALYZED'",
        AND => And: "'AND'",
        AS => As: "'AS'",
        ASC => Asc: "'ASC'",
        BETWEEN => Between: "'BETWEEN'",
        BY => By: "'BY'",
        CAST => Cast: "'CAST'",
        CATALOGS => Catalogs: "'CATALOGS'",
        COLUMNS => Columns: "'COLUMNS'",
        DEBUG => Debug: "'DEBUG'",
        DESC => Desc: "'DESC'",
        DESCRIBE => Describe: "'DESCRIBE'",
        DISTINCT => Distinct: "'DISTINCT'",
        ESCAPE => Escape: "'ESCAPE'",
        EXECUTABLE => Executable: "'EXECUTABLE'",
        EXISTS => Exists: "'EXISTS'",
        EXPLAIN => Explain: "'EXPLAIN'",
        EXTRACT => Extract: "'EXTRACT'",
        FALSE => False: "'FALSE'",
        FORMAT_KW => Format: "'FORMAT'",
        FROM => From: "'FROM'",
        FULL => Full: "'FULL'",
        FUNCTIONS => Functions: "'FUNCTIONS'",
        GRAPHVIZ => Graphviz: "'GRAPHVIZ'",
        GROUP => Group: "'GROUP'",
        HAVING => Having: "'HAVING'",
        IN => In: "'IN'",
        INNER => Inner: "'INNER'",
        IS => Is: "'IS'",
        JOIN => Join: "'JOIN'",
        LEFT => Left: "'LEFT'",
        LIKE => Like: "'LIKE'",
        LIMIT => Limit: "'LIMIT'",
        MAPPED => Mapped: "'MAPPED'",
        MATCH => Match: "'MATCH'",
        NATURAL => Natural: "'NATURAL'",
        NOT => Not: "'NOT'",
        NULL => Null: "'NULL'",
        ON => On: "'ON'",
        OPTIMIZED => Optimized: "'OPTIMIZED'",
        OR => Or: "'OR'",
        ORDER => Order: "'ORDER'",
        OUTER => Outer: "'OUTER'",
        PARSED => Parsed: "'PARSED'",
        PHYSICAL => Physical: "'PHYSICAL'",
        PLAN => Plan: "'PLAN'",
        QUERY => Query: "'QUERY'",
        RIGHT => Right: "'RIGHT'",
        RLIKE => Rlike: "'RLIKE'",
        SCHEMAS => Schemas: "'SCHEMAS'",
        SELECT => Select: "'SELECT'",
        SHOW => Show: "'SHOW'",
        TABLES => Tables: "'TABLES'",
        TEXT => Text: "'TEXT'",
        TRUE => True: "'TRUE'",
        TYPE => Type: "'TYPE'",
        USING => Using: "'USING'",
        VERIFY => Verify: "'VERIFY'",
        WHERE => Where: "'WHERE'",
        WITH => With: "'WITH'",
    }
}

const EXPECT_EXPRESSION: &[&str] = &["expression"];
const EXPECT_IDENTIFIER: &[&str] = &["identifier"];
const EXPECT_LEFT_PAREN: &[&str] = &["'('"];

impl RuleId {
    /// What a failed attempt at this rule contributes to an "expecting ..."
    /// set: the tokens it can start with, or a category name where that set
    /// is too wide to list.
    pub(crate) fn expected_tokens(self) -> &'static [&'static str] {
        use RuleId::*;
        match self {
            SingleStatement => &["statement"],
            SingleExpression | Expression | BooleanExpression | BooleanTerm | Predicated
            | ValueExpression | AdditiveExpression | MultiplicativeExpression | SelectItem
            | OrderBy | GroupBy | GroupingElement | Star | FunctionCall | Dereference
            | ColumnReference => EXPECT_EXPRESSION,
            StatementDefault | Query => &["'('", "'SELECT'", "'WITH'"],
            QueryNoWith => &["'('", "'SELECT'"],
            QuerySpecification => &["'SELECT'"],
            Explain => &["'EXPLAIN'"],
            Debug => &["'DEBUG'"],
            ExplainOptions | DebugOptions | Subquery | SubqueryExpression
            | ParenthesizedExpression | AliasedQuery | AliasedRelation => EXPECT_LEFT_PAREN,
            ExplainOption => &["'FORMAT'", "'PLAN'", "'VERIFY'"],
            DebugOption => &["'FORMAT'", "'PLAN'"],
            ShowTables | ShowColumns | ShowFunctions | ShowSchemas => &["'SHOW'"],
            Describe => &["'DESC'", "'DESCRIBE'"],
            SetQuantifier => &["'ALL'", "'DISTINCT'"],
            FromClause => &["'FROM'"],
            Relation | TableName => &["relation"],
            JoinRelation => &["'FULL'", "'INNER'", "'JOIN'", "'LEFT'", "'NATURAL'", "'RIGHT'"],
            JoinType => &["'FULL'", "'INNER'", "'JOIN'", "'LEFT'", "'RIGHT'"],
            JoinCriteria => &["'ON'", "'USING'"],
            LogicalNot => &["'NOT'"],
            Exists => &["'EXISTS'"],
            StringQuery => &["'QUERY'"],
            MatchQuery | MultiMatchQuery => &["'MATCH'"],
            Predicate => &["'BETWEEN'", "'IN'", "'IS'", "'LIKE'", "'NOT'", "'RLIKE'"],
            Pattern | StringValue => &["'?'", "STRING"],
            ArithmeticUnary => &["'+'", "'-'"],
            ComparisonOperator => &["'<'", "'<='", "'<>'", "'='", "'>'", "'>='"],
            Cast => &["'CAST'"],
            Extract => &["'EXTRACT'"],
            NullLiteral => &["'NULL'"],
            BooleanLiteral | BooleanValue => &["'FALSE'", "'TRUE'"],
            NumericLiteral => &["DECIMAL_VALUE", "INTEGER_VALUE"],
            DecimalLiteral => &["DECIMAL_VALUE"],
            IntegerLiteral => &["INTEGER_VALUE"],
            StringLiteral => &["STRING"],
            ParamLiteral => &["'?'"],
            TableIdentifier | DataType | QualifiedName | NamedQuery | Identifier
            | QuotedIdentifier | BackquotedIdentifier | UnquotedIdentifier | DigitIdentifier
            | NonReserved => EXPECT_IDENTIFIER,
        }
    }
}

impl TokenKind {
    /// True for comment tokens, which the recognizer routes to the hidden channel.
    pub fn is_comment(self) -> bool {
        matches!(self, TokenKind::SimpleComment | TokenKind::BracketedComment)
    }

    /// True for reserved and non-reserved keywords.
    pub fn is_keyword(self) -> bool {
        let name = self.display_name();
        name.len() > 2
            && name.starts_with('\'')
            && name[1..name.len() - 1].bytes().all(|b| b.is_ascii_uppercase())
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_modes_map_entry_rules_onto_the_same_ids() {
        let optimistic = optimistic::Rule::entry(EntryPoint::Statement).symbol();
        let exhaustive = exhaustive::Rule::entry(EntryPoint::Statement).symbol();
        assert_eq!(optimistic, Some(Symbol::Rule(RuleId::SingleStatement)));
        assert_eq!(optimistic, exhaustive);
    }

    #[test]
    fn hidden_rules_have_no_symbol() {
        assert_eq!(exhaustive::Rule::WHITESPACE.symbol(), None);
        assert_eq!(optimistic::Rule::WHITESPACE.symbol(), None);
    }

    #[test]
    fn rule_names_follow_the_grammar() {
        assert_eq!(RuleId::NonReserved.name(), "non_reserved");
        assert_eq!(RuleId::StringValue.name(), "string");
        assert_eq!(TokenKind::Select.display_name(), "'SELECT'");
        assert_eq!(TokenKind::Eof.to_string(), "<EOF>");
    }

    #[test]
    fn rules_expect_their_leading_tokens() {
        assert_eq!(RuleId::SetQuantifier.expected_tokens(), ["'ALL'", "'DISTINCT'"]);
        assert_eq!(RuleId::BooleanTerm.expected_tokens(), ["expression"]);
        assert_eq!(RuleId::JoinCriteria.expected_tokens(), ["'ON'", "'USING'"]);
        assert_eq!(RuleId::NonReserved.expected_tokens(), ["identifier"]);
        assert_eq!(
            RuleId::Query.expected_tokens(),
            [TokenKind::LeftParen, TokenKind::Select, TokenKind::With].map(TokenKind::display_name)
        );
    }

    #[test]
    fn keywords_are_told_apart_from_punctuation() {
        assert!(TokenKind::Select.is_keyword());
        assert!(TokenKind::Format.is_keyword());
        assert!(!TokenKind::LeftParen.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
    }
}
