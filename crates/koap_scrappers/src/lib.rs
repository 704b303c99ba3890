pub mod enumerator;
pub mod extractor;
pub mod fetcher;
pub mod logging;
pub mod manager;

pub use enumerator::{ArticleId, UrlEnumerator};
pub use extractor::{ExtractedPage, Extractor};
pub use fetcher::{FetchOutcome, Fetcher, HttpResponse, HttpTransport, ReqwestTransport};
pub use manager::{CollectReport, Collection, ScraperManager};

pub mod prelude {
    pub use super::fetcher::HttpTransport;
    pub use koap_core::{Article, Error, Result, Section};
}
