//! WHERE conditions resolved against a loaded table

use regex::Regex;
use sqlpad_core::{QueryError, Result, TableData};
use sqlpad_parser::{Condition, Operator, Value};
use std::cmp::Ordering;
use tracing::warn;

#[derive(Debug, Clone)]
enum Test {
    Equals(String),
    NotEquals(String),
    /// Numeric comparison; passes when the ordering of cell vs value is one of these
    Compare { value: f64, accept: [Ordering; 2] },
    Like(Regex),
    In(Vec<String>),
    /// Unrecognized operator in permissive mode
    Pass,
}

/// A condition bound to a column index, ready to run over rows.
#[derive(Debug, Clone)]
pub struct CompiledCondition {
    column: usize,
    test: Test,
}

impl CompiledCondition {
    pub fn compile(condition: &Condition, table: &TableData) -> Result<Self> {
        let column = table
            .column_index(&condition.column)
            .ok_or_else(|| QueryError::UnknownColumn(condition.column.clone()))?;

        let test = match &condition.operator {
            Operator::Eq => Test::Equals(text_of(&condition.value)),
            Operator::NotEq => Test::NotEquals(text_of(&condition.value)),
            Operator::Gt => compare(&condition.value, [Ordering::Greater, Ordering::Greater]),
            Operator::Lt => compare(&condition.value, [Ordering::Less, Ordering::Less]),
            Operator::GtEq => compare(&condition.value, [Ordering::Greater, Ordering::Equal]),
            Operator::LtEq => compare(&condition.value, [Ordering::Less, Ordering::Equal]),
            Operator::Like => Test::Like(like_regex(&text_of(&condition.value))?),
            Operator::In => Test::In(match &condition.value {
                Value::List(items) => items.clone(),
                Value::Text(item) => vec![item.clone()],
            }),
            Operator::Unrecognized(op) => {
                warn!(
                    column = %condition.column,
                    operator = %op,
                    "unrecognized operator, condition always passes"
                );
                Test::Pass
            }
        };

        Ok(Self { column, test })
    }

    pub fn matches(&self, row: &[String]) -> bool {
        let cell = row.get(self.column).map(String::as_str).unwrap_or("");

        match &self.test {
            Test::Equals(value) => cell == value,
            Test::NotEquals(value) => cell != value,
            Test::Compare { value, accept } => cell
                .parse::<f64>()
                .ok()
                .and_then(|n| n.partial_cmp(value))
                .is_some_and(|ord| accept.contains(&ord)),
            Test::Like(regex) => regex.is_match(cell),
            Test::In(values) => values.iter().any(|v| v == cell),
            Test::Pass => true,
        }
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::Text(text) => text.clone(),
        Value::List(items) => items.join(","),
    }
}

/// A value that does not parse as a number becomes NaN and matches nothing.
fn compare(value: &Value, accept: [Ordering; 2]) -> Test {
    let value = text_of(value).trim().parse::<f64>().unwrap_or(f64::NAN);
    Test::Compare { value, accept }
}

/// Translate a LIKE pattern into an anchored, case-insensitive regex.
/// `%` matches any run of characters and `_` exactly one.
fn like_regex(pattern: &str) -> Result<Regex> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push_str("(?is)^");
    for ch in pattern.chars() {
        match ch {
            '%' => expr.push_str(".*"),
            '_' => expr.push('.'),
            other => expr.push_str(&regex::escape(other.encode_utf8(&mut [0u8; 4]))),
        }
    }
    expr.push('$');

    Regex::new(&expr).map_err(|e| {
        QueryError::MalformedQuery(format!("invalid LIKE pattern '{}': {}", pattern, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TableData {
        TableData::new(
            vec!["Name".into(), "Price".into()],
            vec![vec!["Apple Pie".into(), "12.5".into()]],
        )
    }

    fn condition(column: &str, op: &str, value: &str) -> Condition {
        Condition {
            column: column.to_string(),
            operator: Operator::parse(op),
            value: Value::Text(value.to_string()),
        }
    }

    fn check(column: &str, op: &str, value: &str, cell: &str) -> bool {
        let compiled = CompiledCondition::compile(&condition(column, op, value), &table()).unwrap();
        let row = match column {
            "Name" => vec![cell.to_string(), "0".to_string()],
            _ => vec!["x".to_string(), cell.to_string()],
        };
        compiled.matches(&row)
    }

    #[test]
    fn test_equality_is_case_sensitive() {
        assert!(check("Name", "=", "Apple Pie", "Apple Pie"));
        assert!(!check("Name", "=", "apple pie", "Apple Pie"));
        assert!(check("Name", "!=", "Widget", "Apple Pie"));
    }

    #[test]
    fn test_numeric_comparisons() {
        assert!(check("Price", ">", "10", "12.5"));
        assert!(!check("Price", "<", "10", "12.5"));
        assert!(check("Price", ">=", "12.5", "12.5"));
        assert!(check("Price", "<=", "12.50", "12.5"));
        assert!(!check("Price", ">", "10", "n/a"));
        assert!(!check("Price", "<=", "10", ""));
        assert!(!check("Price", ">", "ten", "12.5"));
    }

    #[test]
    fn test_like_is_anchored_and_case_insensitive() {
        assert!(check("Name", "LIKE", "A%e", "Apple Pie"));
        assert!(check("Name", "like", "a%E", "Apple Pie"));
        assert!(!check("Name", "LIKE", "Pie", "Apple Pie"));
        assert!(check("Name", "LIKE", "%Pie", "Apple Pie"));
        assert!(check("Name", "LIKE", "Appl_ Pie", "Apple Pie"));
        assert!(!check("Name", "LIKE", "Appl_Pie", "Apple Pie"));
    }

    #[test]
    fn test_like_escapes_regex_metacharacters() {
        assert!(check("Name", "LIKE", "a.c", "a.c"));
        assert!(!check("Name", "LIKE", "a.c", "abc"));
        assert!(check("Name", "LIKE", "(x)%", "(x) y"));
    }

    #[test]
    fn test_in_list() {
        let condition = Condition {
            column: "Name".to_string(),
            operator: Operator::In,
            value: Value::List(vec!["Widget".to_string(), "Apple Pie".to_string()]),
        };
        let compiled = CompiledCondition::compile(&condition, &table()).unwrap();
        assert!(compiled.matches(&["Apple Pie".to_string(), "1".to_string()]));
        assert!(!compiled.matches(&["Gadget".to_string(), "1".to_string()]));
    }

    #[test]
    fn test_unrecognized_operator_passes() {
        assert!(check("Price", "<>", "12.5", "12.5"));
        assert!(check("Name", "~", "zzz", "Apple Pie"));
    }

    #[test]
    fn test_unknown_column() {
        let err = CompiledCondition::compile(&condition("Cost", "=", "1"), &table()).unwrap_err();
        assert!(matches!(err, QueryError::UnknownColumn(ref c) if c == "Cost"));
    }
}
