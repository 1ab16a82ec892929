//! Where raw CSV text comes from
//!
//! A table named `T` is addressed as the resource `T.csv`, relative to a
//! directory or a base URL depending on the source.

use async_trait::async_trait;
use dashmap::DashMap;
use sqlpad_core::{QueryError, Result};
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

#[async_trait]
pub trait TableSource: Debug + Send + Sync {
    /// Fetch the raw CSV text for `table`.
    ///
    /// Fails with [`QueryError::NotFound`] when the resource does not exist
    /// and with [`QueryError::LoadError`] on any transport failure.
    async fn fetch(&self, table: &str) -> Result<String>;

    /// Human-readable location of `table`, for logs and diagnostics.
    fn location(&self, table: &str) -> String;
}

/// Reads `<root>/<table>.csv` from the local filesystem.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, table: &str) -> PathBuf {
        self.root.join(format!("{}.csv", table))
    }
}

#[async_trait]
impl TableSource for DirectorySource {
    async fn fetch(&self, table: &str) -> Result<String> {
        let path = self.path_for(table);
        debug!(path = %path.display(), "reading table file");

        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => QueryError::NotFound(table.to_string()),
                _ => QueryError::load(table, e),
            })
    }

    fn location(&self, table: &str) -> String {
        self.path_for(table).display().to_string()
    }
}

/// Issues `GET <base_url>/<table>.csv`.
#[derive(Debug, Clone)]
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    fn url_for(&self, table: &str) -> String {
        format!("{}/{}.csv", self.base_url.trim_end_matches('/'), table)
    }
}

#[async_trait]
impl TableSource for HttpSource {
    async fn fetch(&self, table: &str) -> Result<String> {
        let url = self.url_for(table);
        debug!(url = %url, "fetching table");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| QueryError::load(table, e))?;

        if !response.status().is_success() {
            debug!(url = %url, status = %response.status(), "table fetch failed");
            return Err(QueryError::NotFound(table.to_string()));
        }

        response.text().await.map_err(|e| QueryError::load(table, e))
    }

    fn location(&self, table: &str) -> String {
        self.url_for(table)
    }
}

/// CSV text held in memory, keyed by table name.
#[derive(Debug, Default)]
pub struct MemorySource {
    tables: DashMap<String, String>,
    fetches: AtomicUsize,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(self, table: impl Into<String>, csv: impl Into<String>) -> Self {
        self.insert(table, csv);
        self
    }

    pub fn insert(&self, table: impl Into<String>, csv: impl Into<String>) {
        self.tables.insert(table.into(), csv.into());
    }

    /// Number of `fetch` calls served so far, including failed ones.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TableSource for MemorySource {
    async fn fetch(&self, table: &str) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.tables
            .get(table)
            .map(|csv| csv.value().clone())
            .ok_or_else(|| QueryError::NotFound(table.to_string()))
    }

    fn location(&self, table: &str) -> String {
        format!("memory://{}.csv", table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TableLoader;
    use sqlpad_cache::CacheConfig;
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_directory_source_reads_csv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("orders.csv"), "OrderID,Total\n1,150").unwrap();

        let source = DirectorySource::new(dir.path());
        let text = source.fetch("orders").await.unwrap();
        assert_eq!(text, "OrderID,Total\n1,150");
    }

    #[tokio::test]
    async fn test_directory_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DirectorySource::new(dir.path());

        let err = source.fetch("orders").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(ref t) if t == "orders"));
    }

    #[tokio::test]
    async fn test_directory_source_read_failure_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory named like the file cannot be read as text.
        std::fs::create_dir(dir.path().join("orders.csv")).unwrap();

        let source = DirectorySource::new(dir.path());
        let err = source.fetch("orders").await.unwrap_err();
        assert!(matches!(err, QueryError::LoadError { ref table, .. } if table == "orders"));
    }

    #[test]
    fn test_http_source_url() {
        let source = HttpSource::new("http://localhost:5173/");
        assert_eq!(
            source.location("products"),
            "http://localhost:5173/products.csv"
        );
    }

    #[tokio::test]
    async fn test_http_source_transport_failure() {
        // Port 9 (discard) on localhost is not expected to accept HTTP.
        let source = HttpSource::new("http://127.0.0.1:9");
        let err = source.fetch("orders").await.unwrap_err();
        assert!(matches!(err, QueryError::LoadError { .. }));
    }

    /// Answer every connection on a local port with `response`.
    async fn serve(response: &'static str) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut request = [0u8; 1024];
                let _ = socket.read(&mut request).await;
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_http_source_error_status_is_not_found() {
        let base =
            serve("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n").await;
        let loader =
            TableLoader::with_config(Arc::new(HttpSource::new(base)), CacheConfig::default());

        let err = loader.load("orders").await.unwrap_err();

        assert!(matches!(err, QueryError::NotFound(ref t) if t == "orders"));
        let stats = loader.stats();
        assert_eq!(stats.size, 0);
        assert!(!stats.contains("orders"));
    }

    #[tokio::test]
    async fn test_http_source_reads_body() {
        let base = serve(
            "HTTP/1.1 200 OK\r\nContent-Length: 17\r\nConnection: close\r\n\r\nOrderID,Total\n1,5",
        )
        .await;
        let source = HttpSource::new(base);

        let text = source.fetch("orders").await.unwrap();
        assert_eq!(text, "OrderID,Total\n1,5");
    }

    #[tokio::test]
    async fn test_memory_source_counts_fetches() {
        let source = MemorySource::new().with_table("orders", "OrderID\n1");

        assert!(source.fetch("orders").await.is_ok());
        assert!(matches!(
            source.fetch("missing").await,
            Err(QueryError::NotFound(_))
        ));
        assert_eq!(source.fetch_count(), 2);
    }
}
