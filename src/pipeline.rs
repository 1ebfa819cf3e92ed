use analytics::{AnalyticsEngine, DatasetSummary};
use anyhow::{Context, Result};
use charts::{ChartRenderer, ChartSize};
use configuration::Config;
use reporter::{ReportStats, TextReport};
use std::path::Path;
use tracing::{info, warn};

/// Runs every stage once, in order: load, merge, summarize, render, report.
pub fn run(config: &Config) -> Result<()> {
    let summary = analyze(config)?;

    info!("Rendering charts...");
    let renderer = ChartRenderer::new(
        &config.output.plots_dir,
        ChartSize {
            width: config.charts.width,
            height: config.charts.height,
        },
        ChartSize {
            width: config.charts.heatmap_width,
            height: config.charts.heatmap_height,
        },
    )
    .with_top_countries(config.analysis.top_countries);
    renderer
        .render_all(&summary)
        .context("Failed to render charts")?;

    write_report(&summary, Path::new(&config.output.report))?;

    info!(
        plots = %config.output.plots_dir,
        report = %config.output.report,
        "Analysis complete."
    );
    Ok(())
}

/// Loads both tables, normalizes amounts and computes the summary.
pub fn analyze(config: &Config) -> Result<DatasetSummary> {
    info!("Loading data...");
    let transactions = dataset::load_transactions(Path::new(&config.input.transactions))
        .with_context(|| format!("Failed to load transactions from {}", config.input.transactions))?;
    let rates = dataset::load_exchange_rates(Path::new(&config.input.exchange_rates))
        .with_context(|| {
            format!("Failed to load exchange rates from {}", config.input.exchange_rates)
        })?;
    info!(
        transactions = transactions.len(),
        rate_days = rates.rows().len(),
        currencies = rates.currencies().len(),
        "Data loaded."
    );

    info!("Converting amounts to USD...");
    let merged = analytics::merge(&transactions, &rates);
    info!(kept = merged.len(), dropped = merged.dropped, "Amounts normalized.");
    if merged.dropped > 0 {
        warn!(
            dropped = merged.dropped,
            "Rows without a usable exchange rate were excluded from every statistic."
        );
    }

    let analysis = &config.analysis;
    let engine = AnalyticsEngine::new(
        analysis.histogram_bins,
        analysis.top_countries,
        analysis.density_grid,
    )?;
    let summary = engine.summarize(&merged, &transactions, &rates);
    info!(
        total = summary.total_transactions,
        fraud = summary.fraud_count,
        fraud_pct = %format!("{:.2}", summary.fraud_pct),
        "Statistics calculated."
    );
    Ok(summary)
}

pub fn write_report(summary: &DatasetSummary, path: &Path) -> Result<()> {
    info!("Writing report...");
    TextReport::new(ReportStats::from(summary))
        .write_to(path)
        .context("Failed to write report")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use std::fs::File;

    fn write_parquet(path: &Path, mut df: DataFrame) {
        let mut file = File::create(path).unwrap();
        ParquetWriter::new(&mut file).finish(&mut df).unwrap();
    }

    fn fixture_config(dir: &Path) -> Config {
        let transactions = DataFrame::new(vec![
            Series::new(
                "timestamp",
                &[
                    "2024-01-01 09:15:00",
                    "2024-01-01 23:40:00",
                    "2024-01-02 09:05:00",
                    "2024-01-02 10:00:00",
                    "2024-01-03 12:00:00",
                ],
            ),
            Series::new("currency", &["EUR", "USD", "EUR", "JPY", "USD"]),
            Series::new("amount", &[100.0, 50.0, 45.0, 1000.0, 10.0]),
            Series::new("customer_id", &["C1", "C2", "C1", "C3", "C4"]),
            Series::new("vendor", &["Air", "Cafe", "Air", "Shop", "Shop"]),
            Series::new("vendor_category", &["Travel", "Food", "Travel", "Retail", "Retail"]),
            Series::new("country", &["France", "USA", "France", "Japan", "USA"]),
            Series::new("is_fraud", &[true, false, false, true, false]),
        ])
        .unwrap();
        // No JPY column, and no rates at all for 2024-01-03.
        let rates = DataFrame::new(vec![
            Series::new("date", &["2024-01-01", "2024-01-02"]),
            Series::new("EUR", &[0.9, 0.9]),
            Series::new("USD", &[1.0, 1.0]),
        ])
        .unwrap();

        let mut config = Config::default();
        config.input.transactions = dir.join("tx.parquet").display().to_string();
        config.input.exchange_rates = dir.join("fx.parquet").display().to_string();
        config.output.report = dir.join("report.txt").display().to_string();
        config.output.plots_dir = dir.join("plots").display().to_string();
        config.charts.width = 400;
        config.charts.height = 300;
        config.charts.heatmap_width = 500;
        config.charts.heatmap_height = 400;
        write_parquet(Path::new(&config.input.transactions), transactions);
        write_parquet(Path::new(&config.input.exchange_rates), rates);
        config
    }

    #[test]
    fn unresolvable_rows_are_excluded_from_all_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());

        let summary = analyze(&config).unwrap();
        assert_eq!(summary.total_transactions, 3);
        assert_eq!(summary.dropped_rows, 2);
        assert_eq!(summary.fraud_count, 1);
        assert_eq!(summary.unique_customers, 2);
        assert_eq!(summary.unique_vendors, 2);
        assert!(summary.top_countries.iter().all(|c| c.label != "Japan"));
        assert_eq!(summary.amount_histogram.total(), 3);
    }

    #[test]
    fn report_is_reproducible_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());
        let report = Path::new(&config.output.report);

        write_report(&analyze(&config).unwrap(), report).unwrap();
        let first = std::fs::read_to_string(report).unwrap();
        write_report(&analyze(&config).unwrap(), report).unwrap();
        let second = std::fs::read_to_string(report).unwrap();

        assert_eq!(first, second);
        assert!(first.starts_with(
            "=== Общая статистика ===\n\
             Всего транзакций: 3\n\
             Количество мошеннических: 1 (33.33%)\n"
        ));
    }

    #[test]
    fn run_writes_every_chart_and_the_report() {
        let dir = tempfile::tempdir().unwrap();
        let config = fixture_config(dir.path());

        run(&config).unwrap();

        let plots = Path::new(&config.output.plots_dir);
        for file in charts::CHART_FILES {
            let bytes = std::fs::read(plots.join(file)).unwrap();
            assert!(bytes.starts_with(b"\x89PNG"), "{file} is not a PNG");
        }
        let report = std::fs::read_to_string(&config.output.report).unwrap();
        assert!(report.contains("Всего транзакций: 3\n"));
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.input.transactions = dir.path().join("absent.parquet").display().to_string();
        assert!(analyze(&config).is_err());
    }
}
