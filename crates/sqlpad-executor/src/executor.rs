//! Query execution over cached CSV tables
//!
//! Order of operations is fixed: load the table, resolve the selected
//! columns, filter rows by WHERE, truncate by LIMIT, then re-map each
//! surviving row onto the selected columns.

use crate::config::ExecutorConfig;
use crate::predicate::CompiledCondition;
use sqlpad_cache::CacheSnapshot;
use sqlpad_core::{QueryError, Result, TableData};
use sqlpad_parser::{parse_query, Operator, Projection, QueryIntent};
use sqlpad_storage::TableLoader;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub struct QueryExecutor {
    loader: Arc<TableLoader>,
    config: ExecutorConfig,
}

impl QueryExecutor {
    pub fn new(loader: Arc<TableLoader>) -> Self {
        Self::with_config(loader, ExecutorConfig::default())
    }

    pub fn with_config(loader: Arc<TableLoader>, config: ExecutorConfig) -> Self {
        Self { loader, config }
    }

    /// Parse and run `sql`. Any failure fails the whole call; no partial
    /// results are returned.
    pub async fn execute(&self, sql: &str) -> Result<TableData> {
        let intent = parse_query(sql)?;
        self.execute_intent(&intent).await
    }

    pub async fn execute_intent(&self, intent: &QueryIntent) -> Result<TableData> {
        let start = Instant::now();
        self.validate(intent)?;

        let table = self.loader.load(&intent.table).await?;

        let columns = resolve_projection(&intent.projection, &table)?;
        let conditions = intent
            .conditions
            .iter()
            .map(|c| CompiledCondition::compile(c, &table))
            .collect::<Result<Vec<_>>>()?;

        let rows: Vec<Vec<String>> = table
            .rows()
            .iter()
            .filter(|row| conditions.iter().all(|c| c.matches(row)))
            .take(intent.limit.unwrap_or(usize::MAX))
            .map(|row| columns.iter().map(|&i| row[i].clone()).collect())
            .collect();

        let headers = columns
            .iter()
            .map(|&i| table.headers()[i].clone())
            .collect();

        debug!(
            table = %intent.table,
            rows = rows.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "query executed"
        );

        Ok(TableData::new(headers, rows))
    }

    /// Checks that need no table data.
    fn validate(&self, intent: &QueryIntent) -> Result<()> {
        if !self.config.is_known_table(&intent.table) {
            return Err(QueryError::UnknownTable(intent.table.clone()));
        }

        if self.config.strict_operators {
            if let Some(op) = intent.conditions.iter().find_map(|c| match &c.operator {
                Operator::Unrecognized(op) => Some(op.clone()),
                _ => None,
            }) {
                return Err(QueryError::UnsupportedOperator(op));
            }
        }

        Ok(())
    }

    /// Load a table by name without running a query. The name goes through
    /// the same lower-casing and allow-list as a query's FROM table.
    pub async fn load_table(&self, table: &str) -> Result<Arc<TableData>> {
        let table = table.trim().to_ascii_lowercase();
        if !self.config.is_known_table(&table) {
            return Err(QueryError::UnknownTable(table));
        }
        self.loader.load(&table).await
    }

    pub fn clear_cache(&self) {
        self.loader.clear();
    }

    pub fn cache_stats(&self) -> CacheSnapshot {
        self.loader.stats()
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn loader(&self) -> &Arc<TableLoader> {
        &self.loader
    }
}

/// Column indices in requested order.
fn resolve_projection(projection: &Projection, table: &TableData) -> Result<Vec<usize>> {
    match projection {
        Projection::All => Ok((0..table.num_columns()).collect()),
        Projection::Columns(names) => names
            .iter()
            .map(|name| {
                table
                    .column_index(name)
                    .ok_or_else(|| QueryError::UnknownColumn(name.clone()))
            })
            .collect(),
    }
}
