use chrono::{DateTime, Local};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct HistoryItem {
    pub id: Uuid,
    pub query: String,
    pub timestamp: DateTime<Local>,
}

/// Queries executed during this session.
#[derive(Debug, Default)]
pub struct QueryHistory {
    items: Vec<HistoryItem>,
}

impl QueryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, query: &str) -> &HistoryItem {
        self.items.push(HistoryItem {
            id: Uuid::new_v4(),
            query: query.trim().to_string(),
            timestamp: Local::now(),
        });
        &self.items[self.items.len() - 1]
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryItem> {
        self.items.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newest_first() {
        let mut history = QueryHistory::new();
        let first = history.record("SELECT * FROM orders").id;
        history.record("  SELECT * FROM products  ");

        let queries: Vec<&str> = history.iter().map(|h| h.query.as_str()).collect();
        assert_eq!(queries, ["SELECT * FROM products", "SELECT * FROM orders"]);
        assert_eq!(history.iter().last().unwrap().id, first);
        assert_eq!(history.len(), 2);
    }
}
