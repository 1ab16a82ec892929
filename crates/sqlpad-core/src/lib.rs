pub mod error;
pub mod types;

pub use error::{QueryError, Result};
pub use types::TableData;
