use crate::error::ReportError;
use crate::hypotheses::{PRODUCT_HYPOTHESES, TECHNICAL_HYPOTHESES};
use analytics::DatasetSummary;
use std::path::Path;

/// The statistics printed in the report's first section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportStats {
    pub total_transactions: usize,
    pub fraud_count: usize,
    pub fraud_pct: f64,
    pub unique_customers: usize,
    pub unique_vendors: usize,
}

impl From<&DatasetSummary> for ReportStats {
    fn from(summary: &DatasetSummary) -> Self {
        Self {
            total_transactions: summary.total_transactions,
            fraud_count: summary.fraud_count,
            fraud_pct: summary.fraud_pct,
            unique_customers: summary.unique_customers,
            unique_vendors: summary.unique_vendors,
        }
    }
}

/// The report document: labelled sections, one bullet per hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct TextReport {
    stats: ReportStats,
    product: Vec<String>,
    technical: Vec<String>,
}

impl TextReport {
    /// A report with the standard hypothesis lists.
    pub fn new(stats: ReportStats) -> Self {
        Self::with_hypotheses(stats, &PRODUCT_HYPOTHESES, &TECHNICAL_HYPOTHESES)
    }

    pub fn with_hypotheses(stats: ReportStats, product: &[&str], technical: &[&str]) -> Self {
        Self {
            stats,
            product: product.iter().map(|h| h.to_string()).collect(),
            technical: technical.iter().map(|h| h.to_string()).collect(),
        }
    }

    pub fn render(&self) -> String {
        let s = &self.stats;
        let mut out = format!(
            "=== Общая статистика ===\n\
             Всего транзакций: {}\n\
             Количество мошеннических: {} ({:.2}%)\n\
             Уникальных клиентов: {}\n\
             Уникальных вендоров: {}\n\n",
            s.total_transactions, s.fraud_count, s.fraud_pct, s.unique_customers, s.unique_vendors,
        );

        out.push_str("=== Продуктовые гипотезы ===\n");
        push_bullets(&mut out, &self.product);
        out.push_str("\n=== Технические гипотезы ===\n");
        push_bullets(&mut out, &self.technical);
        out
    }

    /// Writes the rendered report as UTF-8, replacing any existing file.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.render()).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Report written.");
        Ok(())
    }
}

fn push_bullets(out: &mut String, items: &[String]) {
    for item in items {
        out.push_str("- ");
        out.push_str(item);
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> ReportStats {
        ReportStats {
            total_transactions: 1500,
            fraud_count: 37,
            fraud_pct: 37.0 / 1500.0 * 100.0,
            unique_customers: 420,
            unique_vendors: 88,
        }
    }

    #[test]
    fn renders_sections_in_fixed_order() {
        let text = TextReport::with_hypotheses(stats(), &["p1", "p2"], &["t1"]).render();
        let expected = "=== Общая статистика ===\n\
                        Всего транзакций: 1500\n\
                        Количество мошеннических: 37 (2.47%)\n\
                        Уникальных клиентов: 420\n\
                        Уникальных вендоров: 88\n\
                        \n\
                        === Продуктовые гипотезы ===\n\
                        - p1\n\
                        - p2\n\
                        \n\
                        === Технические гипотезы ===\n\
                        - t1\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn standard_report_lists_five_hypotheses_each() {
        let text = TextReport::new(stats()).render();
        assert_eq!(text.lines().filter(|l| l.starts_with("- ")).count(), 10);
        assert!(text.contains("- Внедрить гео-проверку для операций за пределами страны клиента.\n"));
    }

    #[test]
    fn empty_hypothesis_lists_keep_their_headers() {
        let text = TextReport::with_hypotheses(stats(), &[], &[]).render();
        assert!(text.ends_with(
            "Уникальных вендоров: 88\n\
             \n\
             === Продуктовые гипотезы ===\n\
             \n\
             === Технические гипотезы ===\n"
        ));
        assert_eq!(text.lines().count(), 9);
    }

    #[test]
    fn percentage_uses_two_decimals() {
        let mut s = stats();
        s.fraud_count = 1;
        s.fraud_pct = 1.0 / 3.0 * 100.0;
        let text = TextReport::with_hypotheses(s, &[], &[]).render();
        assert!(text.contains("Количество мошеннических: 1 (33.33%)\n"));
    }

    #[test]
    fn rewriting_produces_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let report = TextReport::new(stats());

        std::fs::write(&path, "stale content that is much longer than nothing").unwrap();
        report.write_to(&path).unwrap();
        let first = std::fs::read(&path).unwrap();
        report.write_to(&path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(String::from_utf8(first).unwrap(), report.render());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextReport::new(stats())
            .write_to(&dir.path().join("missing").join("report.txt"))
            .unwrap_err();
        assert!(matches!(err, ReportError::Io { .. }));
    }
}
