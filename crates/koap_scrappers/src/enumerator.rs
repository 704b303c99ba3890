use std::fmt;

use koap_core::{Error, Result, ScrapeConfig};
use url::Url;

/// `chapter.article` pair, e.g. `3.7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArticleId {
    pub chapter: u32,
    pub article: u32,
}

impl ArticleId {
    pub fn new(chapter: u32, article: u32) -> Self {
        Self { chapter, article }
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.chapter, self.article)
    }
}

/// Walks `1..=max_chapter` × `1..=max_article`, chapter-major.
#[derive(Debug, Clone)]
pub struct UrlEnumerator {
    base: Url,
    max_chapter: u32,
    max_article: u32,
    next: Option<ArticleId>,
}

impl UrlEnumerator {
    pub fn new(config: &ScrapeConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if !base.path().ends_with('/') {
            return Err(Error::InvalidUrl(format!(
                "{}: base URL must end with '/'",
                config.base_url
            )));
        }

        let next = (config.max_chapter >= 1 && config.max_article >= 1).then(|| ArticleId::new(1, 1));
        Ok(Self {
            base,
            max_chapter: config.max_chapter,
            max_article: config.max_article,
            next,
        })
    }

    pub fn url_for(&self, id: ArticleId) -> String {
        format!("{}{}/", self.base, id)
    }

    fn successor(&self, id: ArticleId) -> Option<ArticleId> {
        if id.article < self.max_article {
            Some(ArticleId::new(id.chapter, id.article + 1))
        } else if id.chapter < self.max_chapter {
            Some(ArticleId::new(id.chapter + 1, 1))
        } else {
            None
        }
    }
}

impl Iterator for UrlEnumerator {
    type Item = (ArticleId, String);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        self.next = self.successor(id);
        Some((id, self.url_for(id)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(id) => {
                let later_chapters = (self.max_chapter - id.chapter) as usize * self.max_article as usize;
                later_chapters + (self.max_article - id.article + 1) as usize
            }
            None => 0,
        };
        (remaining, Some(remaining))
    }
}
