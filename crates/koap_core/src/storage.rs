use std::path::PathBuf;
use crate::types::Article;
use crate::Result;

pub trait DatasetStorage {
    /// Persist the whole dataset, returning the paths that were written.
    fn store_dataset(&self, articles: &[Article]) -> Result<Vec<PathBuf>>;
}
