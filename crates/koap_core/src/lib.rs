pub mod config;
pub mod error;
pub mod filter;
pub mod storage;
pub mod types;

pub use config::ScrapeConfig;
pub use error::{Error, Result};
pub use filter::is_acceptable;
pub use storage::DatasetStorage;
pub use types::{Article, DatasetSummary, Section};
