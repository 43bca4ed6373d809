//! Grammar Validation Tool for sqlfront
//!
//! The recognizer is generated twice from the same base grammar, once with
//! `optimistic.pest` and once with `exhaustive.pest`. This tool checks that the
//! composition is sound before pest ever sees it: both mode files define the
//! same rules, nothing is defined twice, every reference resolves, and every
//! non-reserved keyword is a keyword.
//!
//! ## Usage
//! ```bash
//! cargo run --bin validate_grammar [grammar-dir]
//! ```

// ============================================================================
// 1. Module docs & imports
// ============================================================================

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

// ============================================================================
// 2. Core data structures
// ============================================================================

/// A rule definition as written in one grammar file
#[derive(Debug, Clone)]
struct Rule {
    name: String,
    file: String,
    line_number: usize,
    references: Vec<String>,
}

/// One parsed `.pest` file
#[derive(Debug)]
struct GrammarFile {
    name: String,
    rules: Vec<Rule>,
}

/// Validation results with categorized issues and reporting functionality
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

/// Consolidated grammar knowledge
struct GrammarConstants {
    built_ins: &'static [&'static str],
    entry_rules: &'static [&'static str],
    mode_files: &'static [&'static str],
    base_file: &'static str,
}

const GRAMMAR_CONSTANTS: GrammarConstants = GrammarConstants {
    built_ins: &[
        "SOI", "EOI", "ANY", "NEWLINE", "ASCII_DIGIT", "ASCII_ALPHA", "ASCII_ALPHA_UPPER",
        "ASCII_ALPHA_LOWER", "ASCII_ALPHANUMERIC", "ASCII_HEX_DIGIT", "POP", "PUSH", "PEEK",
        "PEEK_ALL", "DROP",
    ],
    entry_rules: &[
        "single_statement",
        "single_expression",
        "token_stream",
        "single_token",
        "WHITESPACE",
        "COMMENT",
    ],
    mode_files: &["optimistic.pest", "exhaustive.pest"],
    base_file: "base.pest",
};

// ============================================================================
// 3. Public API implementation
// ============================================================================

/// Main entry point for the validation tool
fn main() {
    let grammar_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("src/syntax/grammar"));

    println!("🔍 Validating grammar in: {}", grammar_dir.display());

    let validation_result = match validate_grammar(&grammar_dir) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Failed to validate grammar: {}", e);
            process::exit(1);
        }
    };

    validation_result.print_report();

    if !validation_result.is_valid() {
        process::exit(1);
    }
}

/// Loads the base grammar and both mode files, then runs every check
fn validate_grammar(dir: &Path) -> Result<ValidationResult, Box<dyn std::error::Error>> {
    let base = load_grammar_file(dir, GRAMMAR_CONSTANTS.base_file)?;
    let modes = GRAMMAR_CONSTANTS
        .mode_files
        .iter()
        .map(|name| load_grammar_file(dir, name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut result = ValidationResult::default();

    println!(
        "📋 Parsed {} base rules, {} mode rules",
        base.rules.len(),
        modes.iter().map(|m| m.rules.len()).sum::<usize>()
    );

    check_mode_rule_sets(&modes, &mut result);
    for mode in &modes {
        check_duplicate_definitions(&base, mode, &mut result);
        check_rule_references(&base, mode, &mut result);
        check_entry_anchoring(&base, mode, &mut result);
    }
    check_non_reserved_keywords(&base, &mut result);
    check_unused_rules(&base, &modes, &mut result);

    Ok(result)
}

// ============================================================================
// 4. ValidationResult implementation
// ============================================================================

impl ValidationReporter for ValidationResult {
    fn report_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    fn report_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl ValidationResult {
    fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn print_report(&self) {
        self.print_section(&self.errors, "❌", "GRAMMAR VALIDATION ERRORS");
        self.print_section(&self.warnings, "⚠️ ", "GRAMMAR WARNINGS");

        if self.is_valid() && self.warnings.is_empty() {
            println!("✅ Grammar validation passed - no issues found");
        }
    }

    fn print_section(&self, items: &[String], emoji: &str, title: &str) {
        if items.is_empty() {
            return;
        }

        eprintln!("{} {}:", emoji, title);
        for item in items {
            eprintln!("  • {}", item);
        }
        eprintln!();
    }
}

// ============================================================================
// 5. Infrastructure/traits
// ============================================================================

trait ValidationReporter {
    fn report_error(&mut self, message: impl Into<String>);
    fn report_warning(&mut self, message: impl Into<String>);
}

// ============================================================================
// 6. Internal helpers (grouped by function)
// ============================================================================

// === Grammar parsing helpers ===
//
// Main flow: load_grammar_file -> parse_grammar_rules -> collect_rule_definition
//            -> extract_rule_references

fn load_grammar_file(dir: &Path, name: &str) -> Result<GrammarFile, Box<dyn std::error::Error>> {
    let path = dir.join(name);
    let content = fs::read_to_string(&path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    Ok(GrammarFile {
        name: name.to_string(),
        rules: parse_grammar_rules(name, &content),
    })
}

/// Splits grammar text into rule definitions by tracking brace pairs
fn parse_grammar_rules(file: &str, content: &str) -> Vec<Rule> {
    let lines: Vec<&str> = content.lines().collect();
    let mut rules = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = strip_comment(lines[i]).trim();
        let Some(name) = find_rule_start(line) else {
            i += 1;
            continue;
        };

        let (definition, next) = collect_rule_definition(&lines, i);
        let body = definition.split_once('=').map_or("", |(_, body)| body);
        rules.push(Rule {
            name: name.to_string(),
            file: file.to_string(),
            line_number: i + 1,
            references: extract_rule_references(body),
        });
        i = next;
    }

    rules
}

fn find_rule_start(line: &str) -> Option<&str> {
    let (name, rest) = line.split_once('=')?;
    let name = name.trim();
    let opens_body = rest.trim_start().trim_start_matches(['_', '@', '$', '!']).starts_with('{');
    (opens_body && is_valid_identifier(name)).then_some(name)
}

/// Collects lines until the braces of the rule body balance
fn collect_rule_definition(lines: &[&str], start: usize) -> (String, usize) {
    let mut definition = String::new();
    let mut depth = 0i32;
    let mut index = start;

    while index < lines.len() {
        let line = strip_comment(lines[index]);
        definition.push_str(line);
        definition.push('\n');
        depth += brace_delta(line);
        index += 1;
        if depth <= 0 {
            break;
        }
    }

    (definition, index)
}

fn brace_delta(line: &str) -> i32 {
    remove_string_literals(line)
        .chars()
        .map(|c| match c {
            '{' => 1,
            '}' => -1,
            _ => 0,
        })
        .sum()
}

// === Rule reference extraction helpers ===

fn is_valid_identifier(text: &str) -> bool {
    !text.is_empty()
        && text.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !text.starts_with(|c: char| c.is_ascii_digit())
}

fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    let mut escaped = false;
    for (index, ch) in line.char_indices() {
        match ch {
            _ if escaped => escaped = false,
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '/' if !in_string && line[index..].starts_with("//") => return &line[..index],
            _ => {}
        }
    }
    line
}

/// Replaces every `"..."` literal (escapes included) with a space
fn remove_string_literals(text: &str) -> String {
    let mut result = String::new();
    let mut chars = text.chars();

    while let Some(ch) = chars.next() {
        if ch != '"' {
            result.push(ch);
            continue;
        }
        while let Some(inner) = chars.next() {
            match inner {
                '\\' => {
                    chars.next();
                }
                '"' => break,
                _ => {}
            }
        }
        result.push(' ');
    }

    result
}

fn extract_rule_references(body: &str) -> Vec<String> {
    let text = remove_string_literals(body);
    let mut references: Vec<String> = text
        .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|word| word.len() > 1 && is_valid_identifier(word))
        .map(str::to_string)
        .collect();

    references.sort();
    references.dedup();
    references
}

// === Validation check helpers ===
//
// Available checks:
// - check_mode_rule_sets: both mode files define the same rules
// - check_duplicate_definitions: no rule is defined twice in one composition
// - check_rule_references: every reference resolves in each composition
// - check_entry_anchoring: entry rules consume the whole input
// - check_non_reserved_keywords: non-reserved words are keywords
// - check_unused_rules: rules nothing refers to

fn check_mode_rule_sets(modes: &[GrammarFile], result: &mut ValidationResult) {
    let Some((first, rest)) = modes.split_first() else {
        return;
    };
    let expected: BTreeSet<&str> = first.rules.iter().map(|r| r.name.as_str()).collect();

    for mode in rest {
        let actual: BTreeSet<&str> = mode.rules.iter().map(|r| r.name.as_str()).collect();
        for missing in expected.difference(&actual) {
            result.report_error(format!(
                "Rule '{}' is defined in {} but not in {}",
                missing, first.name, mode.name
            ));
        }
        for extra in actual.difference(&expected) {
            result.report_error(format!(
                "Rule '{}' is defined in {} but not in {}",
                extra, mode.name, first.name
            ));
        }
    }
}

fn check_duplicate_definitions(base: &GrammarFile, mode: &GrammarFile, result: &mut ValidationResult) {
    let mut seen: HashMap<&str, &Rule> = HashMap::new();

    for rule in base.rules.iter().chain(&mode.rules) {
        if let Some(previous) = seen.insert(rule.name.as_str(), rule) {
            result.report_error(format!(
                "Rule '{}' is defined twice: {} line {} and {} line {}",
                rule.name, previous.file, previous.line_number, rule.file, rule.line_number
            ));
        }
    }
}

fn check_rule_references(base: &GrammarFile, mode: &GrammarFile, result: &mut ValidationResult) {
    let defined: HashSet<&str> = base
        .rules
        .iter()
        .chain(&mode.rules)
        .map(|rule| rule.name.as_str())
        .collect();

    for rule in base.rules.iter().chain(&mode.rules) {
        for reference in &rule.references {
            if !defined.contains(reference.as_str())
                && !GRAMMAR_CONSTANTS.built_ins.contains(&reference.as_str())
            {
                result.report_error(format!(
                    "Rule '{}' ({} line {}) references undefined rule '{}' when combined with {}",
                    rule.name, rule.file, rule.line_number, reference, mode.name
                ));
            }
        }
    }
}

fn check_entry_anchoring(base: &GrammarFile, mode: &GrammarFile, result: &mut ValidationResult) {
    for entry in ["single_statement", "single_expression", "token_stream"] {
        let Some(rule) = base.rules.iter().chain(&mode.rules).find(|r| r.name == entry) else {
            result.report_error(format!("Missing entry rule '{}'", entry));
            continue;
        };
        if !rule.references.iter().any(|r| r == "SOI") || !rule.references.iter().any(|r| r == "EOI") {
            result.report_warning(format!(
                "Entry rule '{}' should anchor with SOI and EOI for complete input consumption",
                entry
            ));
        }
    }
}

fn check_non_reserved_keywords(base: &GrammarFile, result: &mut ValidationResult) {
    let find = |name: &str| base.rules.iter().find(|r| r.name == name);
    let (Some(non_reserved), Some(keyword)) = (find("non_reserved"), find("keyword")) else {
        result.report_error("Missing 'non_reserved' or 'keyword' rule");
        return;
    };

    for word in &non_reserved.references {
        if !keyword.references.contains(word) {
            result.report_error(format!(
                "Non-reserved word '{}' is not listed in 'keyword'; unquoted identifiers would swallow it",
                word
            ));
        }
    }
}

fn check_unused_rules(base: &GrammarFile, modes: &[GrammarFile], result: &mut ValidationResult) {
    let all_rules = || base.rules.iter().chain(modes.iter().flat_map(|m| m.rules.iter()));
    let referenced: HashSet<&str> = all_rules()
        .flat_map(|rule| {
            rule.references
                .iter()
                .filter(move |r| **r != rule.name)
                .map(String::as_str)
        })
        .collect();

    for rule in &base.rules {
        if !referenced.contains(rule.name.as_str())
            && !GRAMMAR_CONSTANTS.entry_rules.contains(&rule.name.as_str())
        {
            result.report_warning(format!(
                "Rule '{}' ({} line {}) is never referenced",
                rule.name, rule.file, rule.line_number
            ));
        }
    }
}
