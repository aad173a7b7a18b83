//! Filter predicates and the native filter query syntax.
//!
//! A query is a conjunction of clauses joined by `&&`:
//!
//! ```text
//! {year} = 2019 && {country} contains "Fr" && {internet daily} >= 80
//! ```
//!
//! Each clause is `{column} operator operand`. Supported operators are
//! `=`/`eq`, `!=`/`ne`, `<`/`lt`, `<=`/`le`, `>`/`gt`, `>=`/`ge`,
//! `contains` and `is blank` (which takes no operand).

use std::cmp::Ordering;

use dash_model::{Column, ColumnKind, Value, format_number};
use serde::{Deserialize, Serialize};

use crate::error::EventError;

/// A comparison applied to one column's cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Predicate {
    Eq(Value),
    Ne(Value),
    Lt(Value),
    Le(Value),
    Gt(Value),
    Ge(Value),
    Contains(String),
    IsBlank,
}

impl Predicate {
    /// Whether `cell`, a value of `column`, satisfies the predicate.
    pub fn matches(&self, column: &Column, cell: &Value) -> bool {
        match self {
            Predicate::Eq(operand) => cell == operand,
            Predicate::Ne(operand) => cell != operand,
            Predicate::Lt(operand) => compare(cell, operand) == Some(Ordering::Less),
            Predicate::Le(operand) => matches!(
                compare(cell, operand),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Predicate::Gt(operand) => compare(cell, operand) == Some(Ordering::Greater),
            Predicate::Ge(operand) => matches!(
                compare(cell, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Predicate::Contains(needle) => {
                !cell.is_missing() && column.render(cell).contains(needle.as_str())
            }
            Predicate::IsBlank => match cell {
                Value::Missing => true,
                Value::Text(text) => text.trim().is_empty(),
                _ => false,
            },
        }
    }

    fn operand(&self) -> Option<&Value> {
        match self {
            Predicate::Eq(v)
            | Predicate::Ne(v)
            | Predicate::Lt(v)
            | Predicate::Le(v)
            | Predicate::Gt(v)
            | Predicate::Ge(v) => Some(v),
            Predicate::Contains(_) | Predicate::IsBlank => None,
        }
    }

    fn with_operand(&self, value: Value) -> Predicate {
        match self {
            Predicate::Eq(_) => Predicate::Eq(value),
            Predicate::Ne(_) => Predicate::Ne(value),
            Predicate::Lt(_) => Predicate::Lt(value),
            Predicate::Le(_) => Predicate::Le(value),
            Predicate::Gt(_) => Predicate::Gt(value),
            Predicate::Ge(_) => Predicate::Ge(value),
            other => other.clone(),
        }
    }

    /// Convert the operand to the column's kind, so that `"2019"` against a
    /// number column compares as `2019` and a category label compares as its
    /// category.
    pub fn coerce(&self, column: &Column) -> Result<Predicate, EventError> {
        let Some(operand) = self.operand() else {
            return Ok(self.clone());
        };
        coerce_value(column, operand).map(|value| self.with_operand(value))
    }
}

/// Orders two cells when they are of the same kind. Missing cells and
/// mismatched kinds never satisfy an ordering comparison.
fn compare(cell: &Value, operand: &Value) -> Option<Ordering> {
    match (cell, operand) {
        (Value::Number(_), Value::Number(_))
        | (Value::Text(_), Value::Text(_))
        | (Value::Category(_), Value::Category(_)) => Some(cell.sort_cmp(operand)),
        _ => None,
    }
}

/// Convert a raw operand to a value of `column`'s kind.
pub fn coerce_value(column: &Column, value: &Value) -> Result<Value, EventError> {
    let invalid = |reason: &str| EventError::InvalidValue {
        column: column.name.to_string(),
        value: format!("{value:?}"),
        reason: reason.to_string(),
    };
    match (&column.kind, value) {
        (_, Value::Missing) => Ok(Value::Missing),
        (ColumnKind::Number, Value::Number(_)) => Ok(value.clone()),
        (ColumnKind::Number, Value::Text(text)) => text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(|| invalid("expected a number")),
        (ColumnKind::Number, Value::Category(_)) => Err(invalid("expected a number")),
        (ColumnKind::Text, Value::Text(_)) => Ok(value.clone()),
        (ColumnKind::Text, Value::Number(n)) => Ok(Value::Text(format_number(*n))),
        (ColumnKind::Text, Value::Category(_)) => Err(invalid("expected text")),
        (ColumnKind::Category(_), Value::Category(_)) => Ok(value.clone()),
        (ColumnKind::Category(labels), Value::Text(text)) => labels
            .parse(text)
            .map(Value::Category)
            .ok_or_else(|| invalid("not one of the column's category labels")),
        (ColumnKind::Category(_), Value::Number(_)) => Err(invalid("expected a category")),
    }
}

/// Parse a native filter query into `(column, predicate)` pairs. Operands are
/// left uncoerced; the caller resolves columns against the schema.
///
/// An empty query yields no clauses (it clears every filter).
pub fn parse_filter_query(query: &str) -> Result<Vec<(String, Predicate)>, EventError> {
    let fail = |reason: String| EventError::InvalidFilterQuery {
        query: query.to_string(),
        reason,
    };
    let mut clauses: Vec<(String, Predicate)> = Vec::new();
    if query.trim().is_empty() {
        return Ok(clauses);
    }
    for raw in query.split("&&") {
        let (column, predicate) = parse_clause(raw.trim()).map_err(fail)?;
        if clauses.iter().any(|(existing, _)| *existing == column) {
            return Err(fail(format!("column '{column}' is filtered more than once")));
        }
        clauses.push((column, predicate));
    }
    Ok(clauses)
}

const SYMBOL_OPERATORS: [&str; 6] = [">=", "<=", "!=", "=", ">", "<"];
const WORD_OPERATORS: [&str; 6] = ["eq", "ne", "lt", "le", "gt", "ge"];

fn parse_clause(clause: &str) -> Result<(String, Predicate), String> {
    let rest = clause
        .strip_prefix('{')
        .ok_or_else(|| format!("clause '{clause}' must start with {{column}}"))?;
    let close = rest
        .find('}')
        .ok_or_else(|| format!("unterminated column name in '{clause}'"))?;
    let column = rest[..close].trim().to_string();
    if column.is_empty() {
        return Err(format!("empty column name in '{clause}'"));
    }
    let rest = rest[close + 1..].trim_start();

    if rest.eq_ignore_ascii_case("is blank") {
        return Ok((column, Predicate::IsBlank));
    }
    if let Some(operand) = strip_word(rest, "contains") {
        let operand = parse_operand(operand, clause)?;
        return Ok((column, Predicate::Contains(operand.to_string())));
    }
    for symbol in SYMBOL_OPERATORS {
        if let Some(operand) = rest.strip_prefix(symbol) {
            let operand = parse_operand(operand, clause)?;
            return Ok((column, build(symbol, operand)));
        }
    }
    for word in WORD_OPERATORS {
        if let Some(operand) = strip_word(rest, word) {
            let operand = parse_operand(operand, clause)?;
            return Ok((column, build(word, operand)));
        }
    }
    Err(format!("missing or unknown operator in '{clause}'"))
}

/// Strip a word operator, requiring whitespace after it.
fn strip_word<'a>(input: &'a str, word: &str) -> Option<&'a str> {
    let head = input.get(..word.len())?;
    let tail = &input[word.len()..];
    (head.eq_ignore_ascii_case(word) && tail.starts_with(char::is_whitespace)).then_some(tail)
}

fn parse_operand(raw: &str, clause: &str) -> Result<Value, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(format!("missing operand in '{clause}'"));
    }
    for quote in ['"', '\''] {
        if let Some(inner) = raw.strip_prefix(quote) {
            return inner
                .strip_suffix(quote)
                .map(Value::text)
                .ok_or_else(|| format!("unterminated string in '{clause}'"));
        }
    }
    Ok(raw
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map_or_else(|| Value::text(raw), Value::Number))
}

fn build(operator: &str, operand: Value) -> Predicate {
    match operator {
        "=" | "eq" => Predicate::Eq(operand),
        "!=" | "ne" => Predicate::Ne(operand),
        "<" | "lt" => Predicate::Lt(operand),
        "<=" | "le" => Predicate::Le(operand),
        ">" | "gt" => Predicate::Gt(operand),
        _ => Predicate::Ge(operand),
    }
}
