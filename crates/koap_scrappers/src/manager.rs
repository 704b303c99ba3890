use std::path::PathBuf;
use std::sync::Arc;

use koap_core::{is_acceptable, Article, DatasetStorage, Error, Result, ScrapeConfig, Section};
use tokio::time::sleep;

use crate::enumerator::{ArticleId, UrlEnumerator};
use crate::extractor::{ExtractedPage, Extractor};
use crate::fetcher::{FetchOutcome, Fetcher, HttpTransport};
use crate::logging::Logger;

/// Characters of the probe article shown in the log.
const PROBE_PREVIEW_CHARS: usize = 200;

/// Per-URL tallies for a collection run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub visited: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub missing: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Collection {
    pub articles: Vec<Article>,
    pub report: CollectReport,
}

enum Visit {
    Accepted(Article),
    Rejected(String),
    Missing,
}

/// Drives the whole scrape: one fetch at a time, paced, in enumeration order.
pub struct ScraperManager {
    config: ScrapeConfig,
    fetcher: Fetcher,
    extractor: Extractor,
    enumerator: UrlEnumerator,
    logger: Logger,
    fetched_once: bool,
}

impl ScraperManager {
    pub fn new(config: ScrapeConfig, transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            fetcher: Fetcher::new(transport, &config),
            extractor: Extractor::new()?,
            enumerator: UrlEnumerator::new(&config)?,
            logger: Logger::new(),
            fetched_once: false,
            config,
        })
    }

    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    /// Sleeps before every fetch but the first.
    async fn fetch_paced(&mut self, url: &str) -> Result<FetchOutcome> {
        if self.fetched_once {
            sleep(self.config.request_delay).await;
        }
        self.fetched_once = true;
        self.fetcher.fetch(url).await
    }

    /// Fetches article 1.1 once to make sure the site is reachable and the
    /// extractor still understands it.
    pub async fn probe(&mut self) -> Result<ExtractedPage> {
        self.logger.info("Тестируем парсинг одной статьи...");
        let url = self.enumerator.url_for(ArticleId::new(1, 1));

        let html = match self.fetch_paced(&url).await? {
            FetchOutcome::Page(html) => html,
            FetchOutcome::Missing => return Err(Error::ProbeFailed(url)),
        };

        let page = self.extractor.extract(&html);
        let preview: String = page.text.chars().take(PROBE_PREVIEW_CHARS).collect();
        self.logger.info(&format!("Заголовок: {}", page.title));
        self.logger.info(&format!("Текст (первые {} символов): {}...", PROBE_PREVIEW_CHARS, preview));
        Ok(page)
    }

    /// Walks the URL space until `target_articles` pages have been accepted.
    /// Failures are contained per URL.
    pub async fn collect(&mut self) -> Result<Collection> {
        self.logger.info("Начинаем сбор статей...");
        let mut collection = Collection::default();
        let target = self.config.target_articles;

        for (id, url) in self.enumerator.clone() {
            if collection.articles.len() >= target {
                break;
            }

            let log = self.logger.clone().with_new_prefixes(format!("[{}]", id));
            log.info(&format!("Парсим: {} (статей собрано: {})", url, collection.articles.len()));
            collection.report.visited += 1;

            match self.visit(id, &url).await {
                Ok(Visit::Accepted(article)) => {
                    log.info(&format!("  ✓ Добавлена: {}", article.title));
                    collection.report.accepted += 1;
                    collection.articles.push(article);
                }
                Ok(Visit::Rejected(title)) => {
                    log.info(&format!("  ✗ Пропущена (мало текста или ошибка): {}", title));
                    collection.report.rejected += 1;
                }
                Ok(Visit::Missing) => {
                    log.debug("  пропуск: 404");
                    collection.report.missing += 1;
                }
                Err(e) => {
                    log.error(&format!("Ошибка при парсинге {}: {}", url, e));
                    collection.report.failed += 1;
                }
            }
        }

        Ok(collection)
    }

    async fn visit(&mut self, id: ArticleId, url: &str) -> Result<Visit> {
        let html = match self.fetch_paced(url).await? {
            FetchOutcome::Page(html) => html,
            FetchOutcome::Missing => return Ok(Visit::Missing),
        };

        let page = self.extractor.extract(&html);
        if !is_acceptable(&page.text) {
            return Ok(Visit::Rejected(page.title));
        }

        let section = Section::classify(&id.to_string());
        Ok(Visit::Accepted(Article::new(page.title, page.text, section)))
    }

    /// Probe, collect, then hand the dataset to `storage`. An empty dataset
    /// is an error and nothing is written.
    pub async fn run(&mut self, storage: &dyn DatasetStorage) -> Result<(Collection, Vec<PathBuf>)> {
        self.probe().await?;
        let collection = self.collect().await?;
        if collection.articles.is_empty() {
            return Err(Error::EmptyDataset);
        }
        let written = storage.store_dataset(&collection.articles)?;
        Ok((collection, written))
    }
}
