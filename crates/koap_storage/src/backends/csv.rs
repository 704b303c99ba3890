use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use koap_core::{Article, DatasetStorage, Result, ScrapeConfig};
use tracing::info;

/// UTF-8 byte-order mark, so spreadsheet tools pick the right encoding.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

const CLEAN_HEADER: [&str; 3] = ["title", "section", "text"];
const STATS_HEADER: [&str; 4] = ["title", "section", "char_count", "word_count"];

/// Writes the corpus file and its statistics sidecar.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    clean_path: PathBuf,
    stats_path: PathBuf,
}

impl CsvStorage {
    pub fn new(config: &ScrapeConfig) -> Self {
        Self {
            clean_path: config.clean_path(),
            stats_path: config.stats_path(),
        }
    }

    pub fn clean_path(&self) -> &Path {
        &self.clean_path
    }

    pub fn stats_path(&self) -> &Path {
        &self.stats_path
    }
}

impl DatasetStorage for CsvStorage {
    fn store_dataset(&self, articles: &[Article]) -> Result<Vec<PathBuf>> {
        write_file(&self.clean_path, |out| write_clean(out, articles))?;
        write_file(&self.stats_path, |out| write_stats(out, articles))?;
        info!(
            "Записано {} статей в {} и {}",
            articles.len(),
            self.clean_path.display(),
            self.stats_path.display()
        );
        Ok(vec![self.clean_path.clone(), self.stats_path.clone()])
    }
}

fn write_file<F>(path: &Path, body: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> io::Result<()>,
{
    let mut out = BufWriter::new(File::create(path)?);
    body(&mut out)?;
    out.flush()?;
    Ok(())
}

/// Always-quoted text field, inner quotes doubled.
fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn write_header<W: Write>(out: &mut W, columns: &[&str]) -> io::Result<()> {
    let row = columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(",");
    writeln!(out, "{}", row)
}

/// `"title","section","text"`, one row per article.
pub fn write_clean<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    out.write_all(BOM)?;
    write_header(out, &CLEAN_HEADER)?;
    for article in articles {
        writeln!(
            out,
            "{},{},{}",
            quoted(&article.title),
            quoted(article.section.label()),
            quoted(&article.text)
        )?;
    }
    Ok(())
}

/// `"title","section",char_count,word_count`; the counts are bare numbers.
pub fn write_stats<W: Write>(out: &mut W, articles: &[Article]) -> io::Result<()> {
    out.write_all(BOM)?;
    write_header(out, &STATS_HEADER)?;
    for article in articles {
        writeln!(
            out,
            "{},{},{},{}",
            quoted(&article.title),
            quoted(article.section.label()),
            article.char_count(),
            article.word_count()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use koap_core::Section;
    use tempfile::tempdir;

    fn sample() -> Vec<Article> {
        vec![
            Article::new("Статья 1.1. Задачи", "Задачи законодательства, \"в кавычках\".", Section::General),
            Article::new("Статья 22.1", "Первый абзац.\nВторой абзац.", Section::Authorities),
        ]
    }

    fn strip_bom(bytes: &[u8]) -> &[u8] {
        assert_eq!(&bytes[..3], BOM);
        &bytes[3..]
    }

    #[test]
    fn test_clean_bytes() {
        let mut buf = Vec::new();
        write_clean(&mut buf, &sample()[..1]).unwrap();
        let text = String::from_utf8(strip_bom(&buf).to_vec()).unwrap();
        assert_eq!(
            text,
            "\"title\",\"section\",\"text\"\n\
             \"Статья 1.1. Задачи\",\"Раздел I. Общие положения\",\"Задачи законодательства, \"\"в кавычках\"\".\"\n"
        );
    }

    #[test]
    fn test_stats_bytes() {
        let mut buf = Vec::new();
        write_stats(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(strip_bom(&buf).to_vec()).unwrap();
        let lines: Vec<_> = text.split_terminator('\n').collect();
        assert_eq!(lines[0], "\"title\",\"section\",\"char_count\",\"word_count\"");
        assert_eq!(lines[1], "\"Статья 1.1. Задачи\",\"Раздел I. Общие положения\",38,4");
        assert!(lines[2].ends_with(",27,4"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let mut buf = Vec::new();
        write_clean(&mut buf, &[]).unwrap();
        assert_eq!(strip_bom(&buf), b"\"title\",\"section\",\"text\"\n");
    }

    #[test]
    fn test_store_and_read_back() {
        let dir = tempdir().unwrap();
        let config = ScrapeConfig::default().with_output_dir(dir.path());
        let storage = CsvStorage::new(&config);
        let articles = sample();

        let written = storage.store_dataset(&articles).unwrap();
        assert_eq!(written, vec![
            dir.path().join("koap_zakonrf_dataset_CLEAN.csv"),
            dir.path().join("koap_zakonrf_dataset_STATS.csv"),
        ]);

        let bytes = std::fs::read(storage.clean_path()).unwrap();
        let mut reader = ::csv::Reader::from_reader(strip_bom(&bytes));
        let read: Vec<Article> = reader.deserialize().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(read, articles);

        let bytes = std::fs::read(storage.stats_path()).unwrap();
        let mut reader = ::csv::Reader::from_reader(strip_bom(&bytes));
        let rows: Vec<::csv::StringRecord> = reader.records().collect::<std::result::Result<_, _>>().unwrap();
        assert_eq!(rows.len(), 2);
        for (row, article) in rows.iter().zip(&articles) {
            assert_eq!(&row[0], article.title);
            assert_eq!(row[2].parse::<usize>().unwrap(), article.char_count());
            assert_eq!(row[3].parse::<usize>().unwrap(), article.word_count());
        }
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let config = ScrapeConfig::default().with_output_dir(dir.path().join("nope"));
        assert!(CsvStorage::new(&config).store_dataset(&sample()).is_err());
    }
}
