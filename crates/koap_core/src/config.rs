use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL: &str = "https://www.zakonrf.info/koap/";
pub const TARGET_ARTICLES: usize = 200;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
pub const DELAY_BETWEEN_REQUESTS: Duration = Duration::from_millis(2000);
pub const MAX_CHAPTER: u32 = 32;
pub const MAX_ARTICLE: u32 = 50;
pub const MAX_ATTEMPTS: u32 = 3;
pub const BACKOFF_STEP: Duration = Duration::from_millis(2000);

pub const CLEAN_FILE: &str = "koap_zakonrf_dataset_CLEAN.csv";
pub const STATS_FILE: &str = "koap_zakonrf_dataset_STATS.csv";

/// Everything the pipeline needs to know up front. `Default` is the
/// production setup; tests shrink the bounds and redirect the output.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub base_url: String,
    pub target_articles: usize,
    pub request_timeout: Duration,
    /// Pause before every fetch except the first one.
    pub request_delay: Duration,
    pub max_chapter: u32,
    pub max_article: u32,
    pub max_attempts: u32,
    /// Sleep after failed attempt `k` is `backoff_step * k`.
    pub backoff_step: Duration,
    pub output_dir: PathBuf,
    pub clean_file: String,
    pub stats_file: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            target_articles: TARGET_ARTICLES,
            request_timeout: REQUEST_TIMEOUT,
            request_delay: DELAY_BETWEEN_REQUESTS,
            max_chapter: MAX_CHAPTER,
            max_article: MAX_ARTICLE,
            max_attempts: MAX_ATTEMPTS,
            backoff_step: BACKOFF_STEP,
            output_dir: PathBuf::from("."),
            clean_file: CLEAN_FILE.to_string(),
            stats_file: STATS_FILE.to_string(),
        }
    }
}

impl ScrapeConfig {
    pub fn clean_path(&self) -> PathBuf {
        self.output_dir.join(&self.clean_file)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.output_dir.join(&self.stats_file)
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
