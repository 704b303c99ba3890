use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

use anyhow::Context;
use koap_core::{DatasetSummary, ScrapeConfig};
use koap_scrappers::logging::init_logging;
use koap_scrappers::{ReqwestTransport, ScraperManager};
use koap_storage::CsvStorage;
use tracing::{error, info, warn};

const RULE_WIDTH: usize = 50;

fn render_summary(summary: &DatasetSummary, config: &ScrapeConfig) -> String {
    let mut out = String::new();
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    let _ = writeln!(out, "\n{}", heavy);
    let _ = writeln!(out, " ГОТОВО! ");
    let _ = writeln!(out, "{}", heavy);
    let _ = writeln!(out, "1. Файл для обучения: {}", config.clean_file);
    let _ = writeln!(out, "2. Файл статистики:   {}", config.stats_file);
    let _ = writeln!(out, "{}", light);
    let _ = writeln!(out, "Всего статей: {}", summary.total);
    let _ = writeln!(out, "Средняя длина: {} символов", summary.average_chars);
    let _ = writeln!(out, "\nПримеры собранных статей:");
    for (i, (title, chars)) in summary.samples.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({} символов)", i + 1, title, chars);
    }
    out
}

async fn run(config: ScrapeConfig) -> anyhow::Result<()> {
    let transport = Arc::new(ReqwestTransport::new(&config).context("failed to build HTTP client")?);
    let storage = CsvStorage::new(&config);
    let mut manager = ScraperManager::new(config, transport)?;

    let (collection, _written) = manager.run(&storage).await?;
    let report = &collection.report;
    info!(
        "Посещено {} адресов: добавлено {}, пропущено {}, не найдено {}, ошибок {}",
        report.visited, report.accepted, report.rejected, report.missing, report.failed
    );

    let summary = DatasetSummary::from_articles(&collection.articles);
    print!("{}", render_summary(&summary, manager.config()));
    Ok(())
}

/// Resolves once `signal` reports Ctrl-C. If the handler could not be
/// installed, logs it and never resolves.
async fn interrupted<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        warn!("Не удалось установить обработчик Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let config = ScrapeConfig::default();

    tokio::select! {
        result = run(config) => {
            if let Err(e) = &result {
                error!("Ошибка выполнения: {:#}", e);
            }
            result
        }
        _ = interrupted(tokio::signal::ctrl_c()) => {
            error!("Прервано пользователем, собранные статьи не сохранены");
            std::process::exit(130)
        }
    }
}
