//! Executor configuration options

use std::collections::BTreeSet;

/// Tables the playground ships CSV files for.
pub const DEFAULT_TABLES: [&str; 8] = [
    "categories",
    "customers",
    "employees",
    "orders",
    "products",
    "suppliers",
    "shippers",
    "order_details",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutorConfig {
    /// Table names a query may reference, lower-cased
    pub known_tables: BTreeSet<String>,
    /// Reject unrecognized WHERE operators instead of letting rows through
    pub strict_operators: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            known_tables: DEFAULT_TABLES.iter().map(|t| t.to_string()).collect(),
            strict_operators: false,
        }
    }
}

impl ExecutorConfig {
    /// Replace the allow-list
    pub fn with_known_tables<I, S>(mut self, tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.known_tables = tables
            .into_iter()
            .map(|t| t.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_strict_operators(mut self, strict: bool) -> Self {
        self.strict_operators = strict;
        self
    }

    pub fn is_known_table(&self, table: &str) -> bool {
        self.known_tables.contains(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allow_list() {
        let config = ExecutorConfig::default();
        assert_eq!(config.known_tables.len(), 8);
        assert!(config.is_known_table("order_details"));
        assert!(!config.is_known_table("users"));
        assert!(!config.strict_operators);
    }

    #[test]
    fn test_known_tables_are_lowercased() {
        let config = ExecutorConfig::default().with_known_tables(["Inventory"]);
        assert!(config.is_known_table("inventory"));
        assert!(!config.is_known_table("orders"));
    }
}
