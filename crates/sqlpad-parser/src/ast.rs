use std::fmt;

/// What a query asks for, before any table is loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryIntent {
    /// Lower-cased table name from `FROM <table>`
    pub table: String,
    pub projection: Projection,
    /// Conditions joined by AND; empty when there is no WHERE clause
    pub conditions: Vec<Condition>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `SELECT *`, or no column list at all
    All,
    /// Explicit column list in requested order
    Columns(Vec<String>),
}

/// A single `<column> <operator> <value>` test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    /// Items of an `IN (a,b,c)` list
    List(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    GtEq,
    LtEq,
    Like,
    In,
    Unrecognized(String),
}

impl Operator {
    pub fn parse(text: &str) -> Self {
        match text.to_ascii_uppercase().as_str() {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            ">" => Operator::Gt,
            "<" => Operator::Lt,
            ">=" => Operator::GtEq,
            "<=" => Operator::LtEq,
            "LIKE" => Operator::Like,
            "IN" => Operator::In,
            _ => Operator::Unrecognized(text.to_string()),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Operator::Gt | Operator::Lt | Operator::GtEq | Operator::LtEq
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Eq => write!(f, "="),
            Operator::NotEq => write!(f, "!="),
            Operator::Gt => write!(f, ">"),
            Operator::Lt => write!(f, "<"),
            Operator::GtEq => write!(f, ">="),
            Operator::LtEq => write!(f, "<="),
            Operator::Like => write!(f, "LIKE"),
            Operator::In => write!(f, "IN"),
            Operator::Unrecognized(op) => write!(f, "{}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_parse() {
        assert_eq!(Operator::parse(">="), Operator::GtEq);
        assert_eq!(Operator::parse("like"), Operator::Like);
        assert_eq!(Operator::parse("In"), Operator::In);
        assert_eq!(
            Operator::parse("<>"),
            Operator::Unrecognized("<>".to_string())
        );
    }

    #[test]
    fn test_operator_display_round_trips() {
        for op in ["=", "!=", ">", "<", ">=", "<=", "LIKE", "IN"] {
            assert_eq!(Operator::parse(op).to_string(), op);
        }
    }
}
