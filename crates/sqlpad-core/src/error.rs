use thiserror::Error;

/// Boxed transport failure carried by [`QueryError::LoadError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Table not found: {0}")]
    NotFound(String),

    #[error("Failed to load table '{table}': {source}")]
    LoadError {
        table: String,
        #[source]
        source: BoxError,
    },

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Unknown table: \"{0}\"")]
    UnknownTable(String),

    #[error("Unknown column: \"{0}\"")]
    UnknownColumn(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
}

impl QueryError {
    pub fn load(table: impl Into<String>, source: impl Into<BoxError>) -> Self {
        QueryError::LoadError {
            table: table.into(),
            source: source.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;
