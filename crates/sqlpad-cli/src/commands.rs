use crate::catalog::PREDEFINED_QUERIES;
use crate::config::{Config, OutputFormat};
use crate::output::print_result;
use anyhow::Result;
use colored::Colorize;
use comfy_table::{Cell, Color, Table as ComfyTable};
use sqlpad_cache::{CacheConfig, TableCache};
use sqlpad_executor::{ExecutorConfig, QueryExecutor};
use sqlpad_storage::{DirectorySource, HttpSource, TableLoader, TableSource};
use std::sync::Arc;
use std::time::Instant;

/// Wire the table source, cache and executor from the configuration.
pub fn build_executor(config: &Config) -> QueryExecutor {
    let source: Arc<dyn TableSource> = match &config.base_url {
        Some(url) => Arc::new(HttpSource::new(url.clone())),
        None => Arc::new(DirectorySource::new(config.data_dir.clone())),
    };
    let cache = Arc::new(TableCache::new(
        CacheConfig::default().with_max_entries(config.cache_capacity),
    ));
    let loader = Arc::new(TableLoader::new(source, cache));

    QueryExecutor::with_config(
        loader,
        ExecutorConfig::default().with_strict_operators(config.strict_operators),
    )
}

pub async fn execute_query(
    executor: &QueryExecutor,
    config: &Config,
    sql: &str,
    format: OutputFormat,
) -> Result<()> {
    let start = Instant::now();
    let result = executor.execute(sql).await?;
    let elapsed = start.elapsed();

    print_result(&result, format, config.max_rows)?;

    // Keep machine-readable output clean.
    if format == OutputFormat::Table {
        println!(
            "{} {} row(s)",
            "✓".bright_green(),
            result.num_rows().to_string().bright_cyan()
        );
        if config.show_timing {
            println!(
                "{} {:.2}ms",
                "Execution time:".bright_yellow(),
                elapsed.as_secs_f64() * 1000.0
            );
        }
    }
    Ok(())
}

pub async fn load_table(executor: &QueryExecutor, table: &str) -> Result<()> {
    let start = Instant::now();
    let table = table.trim().to_ascii_lowercase();
    let data = executor.load_table(&table).await?;

    println!(
        "{} Loaded '{}' ({} rows) from {}",
        "✓".bright_green(),
        table.bright_cyan(),
        data.num_rows(),
        executor.loader().source().location(&table)
    );

    let mut columns = ComfyTable::new();
    columns.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Column").fg(Color::Yellow),
    ]);
    for (i, header) in data.headers().iter().enumerate() {
        columns.add_row(vec![(i + 1).to_string(), header.clone()]);
    }
    println!("{}", columns);
    println!(
        "{} {:.2}ms",
        "Load time:".bright_yellow(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    Ok(())
}

pub fn show_tables(executor: &QueryExecutor) {
    let stats = executor.cache_stats();

    let mut table = ComfyTable::new();
    table.set_header(vec![
        Cell::new("Table Name").fg(Color::Cyan),
        Cell::new("Cached").fg(Color::Yellow),
        Cell::new("Rows").fg(Color::Magenta),
    ]);
    for name in &executor.config().known_tables {
        let entry = stats.entry(name);
        table.add_row(vec![
            name.clone(),
            if entry.is_some() { "yes" } else { "no" }.to_string(),
            entry.map(|e| e.row_count.to_string()).unwrap_or_default(),
        ]);
    }
    println!("{}", table);
}

pub fn show_examples() {
    let mut table = ComfyTable::new();
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Name").fg(Color::Yellow),
        Cell::new("SQL").fg(Color::Green),
        Cell::new("Description").fg(Color::Magenta),
    ]);
    for (i, query) in PREDEFINED_QUERIES.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            query.name.to_string(),
            query.sql.to_string(),
            query.description.to_string(),
        ]);
    }
    println!("{}", table);
}

pub fn show_cache_stats(executor: &QueryExecutor) {
    let stats = executor.cache_stats();
    let counters = executor.loader().cache().counters();

    println!();
    println!("{}", "Table Cache Statistics".bright_yellow().bold());
    println!();

    let mut summary = ComfyTable::new();
    summary.set_header(vec![
        Cell::new("Metric").fg(Color::Cyan),
        Cell::new("Value").fg(Color::Green),
    ]);
    summary.add_row(vec![
        "Entries",
        &format!("{} / {}", stats.size, stats.capacity),
    ]);
    summary.add_row(vec!["Hits", &stats.hits.to_string()]);
    summary.add_row(vec!["Misses", &stats.misses.to_string()]);
    summary.add_row(vec![
        "Hit Rate",
        &format!("{:.1}%", counters.hit_rate() * 100.0),
    ]);
    summary.add_row(vec!["Evictions", &stats.evictions.to_string()]);
    println!("{}", summary);

    if stats.entries.is_empty() {
        return;
    }

    let mut entries = ComfyTable::new();
    entries.set_header(vec![
        Cell::new("Table").fg(Color::Cyan),
        Cell::new("Rows").fg(Color::Magenta),
        Cell::new("Created").fg(Color::Yellow),
        Cell::new("Last Accessed").fg(Color::Yellow),
    ]);
    for entry in &stats.entries {
        entries.add_row(vec![
            entry.name.clone(),
            entry.row_count.to_string(),
            format_millis(entry.created_at),
            format_millis(entry.last_accessed_at),
        ]);
    }
    println!("{}", entries);
}

fn format_millis(millis: u64) -> String {
    i64::try_from(millis)
        .ok()
        .and_then(chrono::DateTime::from_timestamp_millis)
        .map(|t| {
            t.with_timezone(&chrono::Local)
                .format("%H:%M:%S%.3f")
                .to_string()
        })
        .unwrap_or_else(|| millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config_for(dir: &Path) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            cache_capacity: 2,
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_build_executor_reads_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("shippers.csv"), "ShipperID,CompanyName\n1,Speedy Express\n")
            .unwrap();

        let executor = build_executor(&config_for(dir.path()));
        let result = executor
            .execute("SELECT CompanyName FROM shippers WHERE ShipperID = 1")
            .await
            .unwrap();

        assert_eq!(result.rows()[0], ["Speedy Express"]);
        assert_eq!(executor.cache_stats().capacity, 2);
    }

    #[test]
    fn test_format_millis_falls_back_to_raw_value() {
        assert_eq!(format_millis(u64::MAX), u64::MAX.to_string());
    }
}
