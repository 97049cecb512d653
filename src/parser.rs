//! Parser for datalog programs of one query and its views.
//!
//! Syntax:
//! - `?- Q(x, y) :- p(x, z), q(z, y).` - the query (at most one per program)
//! - `V(x) :- p(x, 1).` - a view
//! - `V(x) :- p(x, 1) @ 2.5.` - a view with an inline rank
//! - `x`, `Name_2` - variable (any identifier)
//! - `1`, `-3.5`, `"text"` - constant
//! - `% ...` - comment to end of line
//!
//! Variables are scoped to their rule: `x` in the query and `x` in a view are
//! different variables.

use crate::predicate::Element;
use crate::record::{Query, Record, RecordBuilder, View};
use crate::symbol::SymbolStore;
use crate::trace::debug;

/// Parse error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    pub message: String,
    pub position: usize,
}

impl ParseError {
    fn at(position: usize, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at position {}: {}", self.position, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A parsed program.
#[derive(Debug, Default)]
pub struct Program {
    pub query: Option<Query>,
    /// Views in file order; `ViewId::new(i)` names `views[i]`.
    pub views: Vec<View>,
}

/// Parse a single rule with no terminating period.
pub fn parse_rule(symbols: &SymbolStore, input: &str) -> Result<Record, ParseError> {
    let mut pos = 0;
    skip_whitespace(input, &mut pos);
    let (record, _) = parse_rule_inner(symbols, input, &mut pos)?;
    skip_whitespace(input, &mut pos);
    if pos < input.len() {
        return Err(ParseError::at(pos, "Unexpected characters after rule"));
    }
    Ok(record)
}

/// Parse a whole program: period-terminated rules, the query marked `?-`.
pub fn parse_program(symbols: &SymbolStore, input: &str) -> Result<Program, ParseError> {
    let mut program = Program::default();
    let mut pos = 0;

    loop {
        skip_whitespace(input, &mut pos);
        if pos >= input.len() {
            break;
        }

        let start = pos;
        let is_query = input[pos..].starts_with("?-");
        if is_query {
            pos += 2;
            skip_whitespace(input, &mut pos);
        }

        let (record, rank_at) = parse_rule_inner(symbols, input, &mut pos)?;
        skip_whitespace(input, &mut pos);
        expect_char(input, &mut pos, '.')?;

        if is_query {
            if program.query.is_some() {
                return Err(ParseError::at(start, "Program has more than one query"));
            }
            if let Some(at) = rank_at {
                return Err(ParseError::at(at, "A query cannot carry a rank"));
            }
            program.query = Some(record);
        } else {
            program.views.push(record);
        }
    }

    debug!(
        views = program.views.len(),
        has_query = program.query.is_some(),
        "program_parsed"
    );
    Ok(program)
}

/// `Head(args) :- atom, atom [@ rank]`
///
/// Also returns the offset of the `@` when the rule was ranked explicitly,
/// even with a rank equal to the default.
fn parse_rule_inner(
    symbols: &SymbolStore,
    input: &str,
    pos: &mut usize,
) -> Result<(Record, Option<usize>), ParseError> {
    let name = parse_identifier(input, pos)?;
    let mut builder = RecordBuilder::new(symbols, &name);

    for elem in parse_arguments(&mut builder, input, pos)? {
        builder.push_head(elem);
    }

    skip_whitespace(input, pos);
    if !input[*pos..].starts_with(":-") {
        return Err(ParseError::at(*pos, "Expected ':-' after rule head"));
    }
    *pos += 2;

    loop {
        skip_whitespace(input, pos);
        let atom_name = parse_identifier(input, pos)?;
        let args = parse_arguments(&mut builder, input, pos)?;
        builder.push_subgoal(&atom_name, args);

        skip_whitespace(input, pos);
        if peek(input, *pos) == Some(',') {
            *pos += 1;
        } else {
            break;
        }
    }

    let mut rank_at = None;
    if peek(input, *pos) == Some('@') {
        rank_at = Some(*pos);
        *pos += 1;
        skip_whitespace(input, pos);
        let start = *pos;
        let text = parse_number(input, pos)?;
        let rank: f64 = text
            .parse()
            .map_err(|_| ParseError::at(start, format!("Invalid rank '{}'", text)))?;
        builder.rank(rank);
    }

    Ok((builder.build(), rank_at))
}

/// `( elem, elem, ... )`, possibly empty.
fn parse_arguments(
    builder: &mut RecordBuilder<'_>,
    input: &str,
    pos: &mut usize,
) -> Result<Vec<Element>, ParseError> {
    skip_whitespace(input, pos);
    expect_char(input, pos, '(')?;

    let mut elements = Vec::new();
    skip_whitespace(input, pos);
    if peek(input, *pos) == Some(')') {
        *pos += 1;
        return Ok(elements);
    }

    loop {
        skip_whitespace(input, pos);
        elements.push(parse_element(builder, input, pos)?);
        skip_whitespace(input, pos);
        match peek(input, *pos) {
            Some(',') => *pos += 1,
            Some(')') => {
                *pos += 1;
                return Ok(elements);
            }
            Some(ch) => {
                return Err(ParseError::at(
                    *pos,
                    format!("Expected ',' or ')' but found '{}'", ch),
                ))
            }
            None => return Err(ParseError::at(*pos, "Unclosed argument list")),
        }
    }
}

fn parse_element(
    builder: &mut RecordBuilder<'_>,
    input: &str,
    pos: &mut usize,
) -> Result<Element, ParseError> {
    match peek(input, *pos) {
        Some('"') => {
            let text = parse_string(input, pos)?;
            Ok(builder.constant(&text))
        }
        Some(ch) if ch.is_ascii_digit() || ch == '-' => {
            let text = parse_number(input, pos)?;
            Ok(builder.constant(&text))
        }
        Some(ch) if ch.is_alphabetic() || ch == '_' => {
            let name = parse_identifier(input, pos)?;
            Ok(builder.var(&name))
        }
        Some(ch) => Err(ParseError::at(*pos, format!("Unexpected character '{}'", ch))),
        None => Err(ParseError::at(*pos, "Unexpected end of input")),
    }
}

fn peek(input: &str, pos: usize) -> Option<char> {
    input.get(pos..).and_then(|rest| rest.chars().next())
}

fn expect_char(input: &str, pos: &mut usize, expected: char) -> Result<(), ParseError> {
    match peek(input, *pos) {
        Some(ch) if ch == expected => {
            *pos += ch.len_utf8();
            Ok(())
        }
        Some(ch) => Err(ParseError::at(
            *pos,
            format!("Expected '{}' but found '{}'", expected, ch),
        )),
        None => Err(ParseError::at(*pos, format!("Expected '{}'", expected))),
    }
}

fn skip_whitespace(input: &str, pos: &mut usize) {
    while let Some(ch) = peek(input, *pos) {
        if ch.is_whitespace() {
            *pos += ch.len_utf8();
        } else if ch == '%' {
            // Comment - skip to end of line
            while let Some(c) = peek(input, *pos) {
                if c == '\n' {
                    break;
                }
                *pos += c.len_utf8();
            }
        } else {
            break;
        }
    }
}

/// Parse an identifier (letters, digits, underscores; not starting with a digit).
fn parse_identifier(input: &str, pos: &mut usize) -> Result<String, ParseError> {
    let start = *pos;
    if let Some(ch) = peek(input, *pos) {
        if ch.is_ascii_digit() {
            return Err(ParseError::at(*pos, "Identifier cannot start with a digit"));
        }
    }
    while let Some(ch) = peek(input, *pos) {
        if ch.is_alphanumeric() || ch == '_' {
            *pos += ch.len_utf8();
        } else {
            break;
        }
    }

    if *pos == start {
        return Err(ParseError::at(*pos, "Expected identifier"));
    }

    Ok(input[start..*pos].to_string())
}

/// Integer or decimal literal with an optional leading minus.
fn parse_number(input: &str, pos: &mut usize) -> Result<String, ParseError> {
    let start = *pos;
    if peek(input, *pos) == Some('-') {
        *pos += 1;
    }
    let digits_start = *pos;
    let mut seen_dot = false;
    while let Some(ch) = peek(input, *pos) {
        if ch.is_ascii_digit() {
            *pos += 1;
        } else if ch == '.' && !seen_dot && next_is_digit(input, *pos + 1) {
            seen_dot = true;
            *pos += 1;
        } else {
            break;
        }
    }

    if *pos == digits_start {
        return Err(ParseError::at(start, "Expected number"));
    }
    Ok(input[start..*pos].to_string())
}

// A '.' not followed by a digit terminates the rule.
fn next_is_digit(input: &str, pos: usize) -> bool {
    peek(input, pos).map_or(false, |c| c.is_ascii_digit())
}

/// Double-quoted string, kept with its quotes so it renders back unchanged.
fn parse_string(input: &str, pos: &mut usize) -> Result<String, ParseError> {
    let start = *pos;
    expect_char(input, pos, '"')?;
    while let Some(ch) = peek(input, *pos) {
        *pos += ch.len_utf8();
        if ch == '"' {
            return Ok(input[start..*pos].to_string());
        }
    }
    Err(ParseError::at(start, "Unterminated string literal"))
}

#[cfg(test)]
#[path = "tests/parser.rs"]
mod tests;
