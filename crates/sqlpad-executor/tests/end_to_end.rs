use sqlpad_cache::{CacheConfig, ManualClock, TableCache};
use sqlpad_core::QueryError;
use sqlpad_executor::{ExecutorConfig, QueryExecutor, DEFAULT_TABLES};
use sqlpad_storage::{DirectorySource, TableLoader};
use std::path::Path;
use std::sync::Arc;

fn write_tables(dir: &Path) {
    for table in DEFAULT_TABLES {
        let csv = format!("ID,Name,Total\n1,{table}-a,50\n\n2,{table}-b,150\n3,{table}-c,250\n");
        std::fs::write(dir.join(format!("{}.csv", table)), csv).unwrap();
    }
}

fn executor(dir: &Path) -> (QueryExecutor, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let cache = Arc::new(TableCache::with_clock(CacheConfig::default(), clock.clone()));
    let loader = Arc::new(TableLoader::new(Arc::new(DirectorySource::new(dir)), cache));
    (
        QueryExecutor::with_config(loader, ExecutorConfig::default()),
        clock,
    )
}

#[tokio::test]
async fn queries_run_against_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let (executor, _clock) = executor(dir.path());

    let result = executor
        .execute("SELECT Name, Total FROM orders WHERE Total > 100 LIMIT 1")
        .await
        .unwrap();

    assert_eq!(result.headers(), ["Name", "Total"]);
    assert_eq!(result.rows(), [vec!["orders-b".to_string(), "150".to_string()]]);
}

#[tokio::test]
async fn loading_twice_returns_identical_data() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let (executor, _clock) = executor(dir.path());

    let first = executor.load_table("products").await.unwrap();
    // Removing the file proves the second load is served from the cache.
    std::fs::remove_file(dir.path().join("products.csv")).unwrap();
    let second = executor.load_table("products").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(second.num_rows(), 3);
}

#[tokio::test]
async fn load_cannot_reach_files_outside_the_allow_list() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join("data");
    std::fs::create_dir(&data).unwrap();
    write_tables(&data);
    std::fs::write(root.path().join("secret.csv"), "key\nhunter2\n").unwrap();
    let (executor, _clock) = executor(&data);

    let err = executor.load_table("../secret").await.unwrap_err();

    assert!(matches!(err, QueryError::UnknownTable(ref t) if t == "../secret"));
    assert!(executor.cache_stats().tables.is_empty());
}

#[tokio::test]
async fn cache_keeps_five_most_recent_tables() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    let (executor, clock) = executor(dir.path());

    for table in &DEFAULT_TABLES[..6] {
        executor
            .execute(&format!("SELECT * FROM {}", table))
            .await
            .unwrap();
        clock.advance(1_000);
    }

    let stats = executor.cache_stats();
    assert_eq!(stats.size, 5);
    assert!(!stats.contains(DEFAULT_TABLES[0]));
    for table in &DEFAULT_TABLES[1..6] {
        assert!(stats.contains(table), "{} should still be cached", table);
    }
    assert_eq!(stats.evictions, 1);
}

#[tokio::test]
async fn tables_outside_the_allow_list_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_tables(dir.path());
    std::fs::write(dir.path().join("secrets.csv"), "k,v\n1,2").unwrap();
    let (executor, _clock) = executor(dir.path());

    for name in ["secrets", "users", "orders2", "etc_passwd"] {
        let err = executor
            .execute(&format!("SELECT * FROM {}", name))
            .await
            .unwrap_err();
        assert!(
            matches!(err, QueryError::UnknownTable(ref t) if t == name),
            "unexpected error for {}: {}",
            name,
            err
        );
    }
    assert_eq!(executor.cache_stats().size, 0);
}

#[tokio::test]
async fn missing_file_for_known_table() {
    let dir = tempfile::tempdir().unwrap();
    let (executor, _clock) = executor(dir.path());

    let err = executor
        .execute("SELECT * FROM shippers")
        .await
        .unwrap_err();
    assert!(matches!(err, QueryError::NotFound(ref t) if t == "shippers"));
    assert_eq!(executor.cache_stats().size, 0);
}
