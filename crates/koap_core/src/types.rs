use serde::{Deserialize, Serialize};

/// One accepted KoAP article. Fields are trimmed on construction and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub section: Section,
    pub text: String,
}

impl Article {
    pub fn new(title: impl AsRef<str>, text: impl AsRef<str>, section: Section) -> Self {
        Self {
            title: title.as_ref().trim().to_string(),
            section,
            text: text.as_ref().trim().to_string(),
        }
    }

    /// Length of the body in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of whitespace-separated tokens in the body.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Top-level division of the code, derived from the chapter number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "Раздел I. Общие положения")]
    General,
    #[serde(rename = "Раздел II. Особенная часть")]
    Special,
    #[serde(rename = "Раздел III. Судьи, органы, должностные лица, уполномоченные рассматривать дела об административных правонарушениях")]
    Authorities,
    #[serde(rename = "Раздел IV. Производство по делам об административных правонарушениях")]
    Proceedings,
    #[serde(rename = "Другие разделы")]
    Other,
    /// The chapter part of the identifier was not a number.
    #[serde(rename = "Общие положения")]
    Unclassified,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::General => "Раздел I. Общие положения",
            Section::Special => "Раздел II. Особенная часть",
            Section::Authorities => "Раздел III. Судьи, органы, должностные лица, уполномоченные рассматривать дела об административных правонарушениях",
            Section::Proceedings => "Раздел IV. Производство по делам об административных правонарушениях",
            Section::Other => "Другие разделы",
            Section::Unclassified => "Общие положения",
        }
    }

    pub fn from_chapter(chapter: i32) -> Self {
        match chapter {
            1..=4 => Section::General,
            5..=21 => Section::Special,
            22..=30 => Section::Authorities,
            31..=32 => Section::Proceedings,
            _ => Section::Other,
        }
    }

    /// Classifies an identifier of the form `"C.A"` by its chapter `C`.
    pub fn classify(article_id: &str) -> Self {
        let chapter = article_id.split('.').next().unwrap_or_default();
        match chapter.parse::<i32>() {
            Ok(chapter) => Self::from_chapter(chapter),
            Err(_) => Section::Unclassified,
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Figures printed once the dataset has been written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total: usize,
    pub average_chars: usize,
    pub samples: Vec<(String, usize)>,
}

impl DatasetSummary {
    pub const SAMPLE_SIZE: usize = 3;

    pub fn from_articles(articles: &[Article]) -> Self {
        let total = articles.len();
        let chars: usize = articles.iter().map(Article::char_count).sum();
        let average_chars = if total == 0 { 0 } else { chars / total };
        let samples = articles
            .iter()
            .take(Self::SAMPLE_SIZE)
            .map(|a| (a.title.clone(), a.char_count()))
            .collect();

        Self { total, average_chars, samples }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_boundaries() {
        assert_eq!(Section::classify("4.99"), Section::General);
        assert_eq!(Section::classify("5.1"), Section::Special);
        assert_eq!(Section::classify("21.50"), Section::Special);
        assert_eq!(Section::classify("22.1"), Section::Authorities);
        assert_eq!(Section::classify("30.99"), Section::Authorities);
        assert_eq!(Section::classify("31.1"), Section::Proceedings);
        assert_eq!(Section::classify("32.50"), Section::Proceedings);
        assert_eq!(Section::classify("33.1"), Section::Other);
        assert_eq!(Section::classify("abc.1"), Section::Unclassified);
    }

    #[test]
    fn test_chapter_beyond_int_range_is_unclassified() {
        assert_eq!(Section::classify("2147483647.1"), Section::Other);
        assert_eq!(Section::classify("3000000000.1"), Section::Unclassified);
    }

    #[test]
    fn test_section_labels() {
        assert_eq!(Section::classify("1.1").label(), "Раздел I. Общие положения");
        assert_eq!(Section::classify("0.1").label(), "Другие разделы");
        assert_eq!(Section::classify("-3.1").label(), "Другие разделы");
        assert_eq!(Section::classify("").label(), "Общие положения");
        assert_eq!(Section::classify("12").label(), "Раздел II. Особенная часть");
        assert!(Section::classify("22.1").label().starts_with("Раздел III. Судьи, органы"));
    }

    #[test]
    fn test_every_chapter_maps_to_a_numbered_or_other_section() {
        for chapter in -50..=100 {
            let section = Section::classify(&format!("{chapter}.1"));
            assert_ne!(section, Section::Unclassified, "chapter {chapter}");
        }
    }

    #[test]
    fn test_article_counts() {
        let article = Article::new("  Статья 1.1  ", " один  два\nтри\t четыре ", Section::General);
        assert_eq!(article.title, "Статья 1.1");
        assert_eq!(article.text, "один  два\nтри\t четыре");
        assert_eq!(article.char_count(), 21);
        assert_eq!(article.word_count(), 4);

        let empty = Article::new("t", "", Section::Other);
        assert_eq!(empty.char_count(), 0);
        assert_eq!(empty.word_count(), 0);
    }

    #[test]
    fn test_summary() {
        let articles = vec![
            Article::new("a", "x".repeat(101), Section::General),
            Article::new("b", "y".repeat(102), Section::General),
            Article::new("c", "z".repeat(104), Section::Special),
            Article::new("d", "w".repeat(200), Section::Special),
        ];
        let summary = DatasetSummary::from_articles(&articles);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average_chars, 126);
        assert_eq!(
            summary.samples,
            vec![("a".to_string(), 101), ("b".to_string(), 102), ("c".to_string(), 104)]
        );

        let empty = DatasetSummary::from_articles(&[]);
        assert_eq!(empty.total, 0);
        assert_eq!(empty.average_chars, 0);
        assert!(empty.samples.is_empty());
    }
}
