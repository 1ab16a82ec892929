pub mod csv;
pub mod loader;
pub mod source;

pub use csv::parse_csv;
pub use loader::TableLoader;
pub use source::{DirectorySource, HttpSource, MemorySource, TableSource};
