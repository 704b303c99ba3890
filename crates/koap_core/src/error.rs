use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for URL: {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to fetch {url} after {attempts} attempts: {source}")]
    FetchFailed {
        url: String,
        attempts: u32,
        #[source]
        source: Box<Error>,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Не удалось получить тестовую статью: {0}")]
    ProbeFailed(String),

    #[error("Не удалось собрать ни одной статьи!")]
    EmptyDataset,
}

impl Error {
    /// Transport and status failures are worth another attempt; everything
    /// else is a bug or a local problem.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Http(_) | Error::HttpStatus { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
