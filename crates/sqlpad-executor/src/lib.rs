pub mod config;
pub mod executor;
pub mod predicate;

pub use config::{ExecutorConfig, DEFAULT_TABLES};
pub use executor::QueryExecutor;
pub use predicate::CompiledCondition;
