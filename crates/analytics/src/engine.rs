use crate::correlation::CorrelationMatrix;
use crate::distribution::Histogram;
use crate::error::AnalyticsError;
use crate::normalizer::Normalized;
use crate::summary::{CategoryFraudRate, DatasetSummary, HourCount, RankedCount};
use core_types::{ExchangeRates, MergedRecord, TransactionTable};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Name of the normalized amount column in the correlation matrix.
pub const AMOUNT_USD: &str = "amount_usd";

/// A stateless calculator for deriving the dataset statistics from the merged rows.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    histogram_bins: usize,
    top_countries: usize,
    density_grid: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            top_countries: 10,
            density_grid: 200,
        }
    }
}

impl AnalyticsEngine {
    pub fn new(
        histogram_bins: usize,
        top_countries: usize,
        density_grid: usize,
    ) -> Result<Self, AnalyticsError> {
        if histogram_bins == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "histogram_bins",
                reason: "must be at least 1".to_string(),
            });
        }
        if top_countries == 0 {
            return Err(AnalyticsError::InvalidParameter {
                name: "top_countries",
                reason: "must be at least 1".to_string(),
            });
        }
        if density_grid < 2 {
            return Err(AnalyticsError::InvalidParameter {
                name: "density_grid",
                reason: "must be at least 2".to_string(),
            });
        }
        Ok(Self {
            histogram_bins,
            top_countries,
            density_grid,
        })
    }

    /// The main entry point for calculating the dataset statistics.
    ///
    /// # Arguments
    ///
    /// * `merged` - The rows that survived currency normalization.
    /// * `table` - The transaction table the rows point into (for numeric features).
    /// * `rates` - The rate table the rows point into (for rate columns).
    ///
    /// An empty `merged` yields zero counts and empty grouped aggregates.
    pub fn summarize(
        &self,
        merged: &Normalized<'_>,
        table: &TransactionTable,
        rates: &ExchangeRates,
    ) -> DatasetSummary {
        let records = merged.records.as_slice();
        let mut summary = DatasetSummary {
            dropped_rows: merged.dropped,
            ..Default::default()
        };

        self.calculate_totals(records, &mut summary);

        let amounts: Vec<f64> = records.iter().map(|r| r.amount_usd).collect();
        summary.amount_histogram =
            Histogram::compute(&amounts, self.histogram_bins, self.density_grid);
        summary.top_countries = self.rank_countries(records);
        summary.fraud_by_category = fraud_by_category(records);
        summary.transactions_by_hour = transactions_by_hour(records);
        summary.correlation = correlate(records, table, rates);

        tracing::debug!(
            total = summary.total_transactions,
            fraud = summary.fraud_count,
            features = summary.correlation.len(),
            "Summary calculated."
        );
        summary
    }

    /// Calculates the scalar statistics.
    fn calculate_totals(&self, records: &[MergedRecord<'_>], summary: &mut DatasetSummary) {
        summary.total_transactions = records.len();
        summary.fraud_count = records
            .iter()
            .filter(|r| r.transaction.is_fraudulent())
            .count();

        if summary.total_transactions > 0 {
            summary.fraud_pct =
                summary.fraud_count as f64 / summary.total_transactions as f64 * 100.0;
        }

        summary.unique_customers = distinct(records, |r| r.transaction.customer_id.as_deref());
        summary.unique_vendors = distinct(records, |r| r.transaction.vendor.as_deref());
    }

    /// Country frequency, count descending; ties keep first-appearance order.
    fn rank_countries(&self, records: &[MergedRecord<'_>]) -> Vec<RankedCount> {
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for country in records.iter().filter_map(|r| r.transaction.country.as_deref()) {
            let count = counts.entry(country).or_insert_with(|| {
                order.push(country);
                0
            });
            *count += 1;
        }

        let mut ranked: Vec<RankedCount> = order
            .into_iter()
            .map(|country| RankedCount {
                label: country.to_string(),
                count: counts[country],
            })
            .collect();
        // `sort_by` is stable, so equal counts stay in first-seen order.
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(self.top_countries);
        ranked
    }
}

fn distinct<'a, F>(records: &[MergedRecord<'a>], key: F) -> usize
where
    F: Fn(&MergedRecord<'a>) -> Option<&'a str>,
{
    records.iter().filter_map(key).collect::<HashSet<_>>().len()
}

/// Mean fraud flag per vendor category, highest first.
///
/// Categories are visited in sorted order before the stable sort, so ties
/// come out alphabetically.
fn fraud_by_category(records: &[MergedRecord<'_>]) -> Vec<CategoryFraudRate> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for record in records {
        let tx = record.transaction;
        let (Some(category), Some(flag)) = (tx.vendor_category.as_deref(), tx.is_fraud) else {
            continue;
        };
        let (fraud, seen) = groups.entry(category).or_default();
        *fraud += usize::from(flag);
        *seen += 1;
    }

    let mut rates: Vec<CategoryFraudRate> = groups
        .into_iter()
        .map(|(category, (fraud, seen))| CategoryFraudRate {
            category: category.to_string(),
            rate: fraud as f64 / seen as f64,
        })
        .collect();
    rates.sort_by(|a, b| b.rate.total_cmp(&a.rate));
    rates
}

fn transactions_by_hour(records: &[MergedRecord<'_>]) -> Vec<HourCount> {
    let mut hours: BTreeMap<u32, usize> = BTreeMap::new();
    for record in records {
        *hours.entry(record.hour).or_default() += 1;
    }
    hours
        .into_iter()
        .map(|(hour, count)| HourCount { hour, count })
        .collect()
}

/// Correlates the transaction table's numeric columns, the rate columns and
/// the normalized amount, in that order.
fn correlate(
    records: &[MergedRecord<'_>],
    table: &TransactionTable,
    rates: &ExchangeRates,
) -> CorrelationMatrix {
    let mut columns: Vec<(String, Vec<Option<f64>>)> = Vec::new();

    for feature in table.features() {
        let values = records.iter().map(|r| feature.values[r.index]).collect();
        columns.push((feature.name.clone(), values));
    }
    for currency in rates.currencies() {
        let values = records.iter().map(|r| r.rates.rate(currency)).collect();
        columns.push((currency.clone(), values));
    }
    columns.push((
        AMOUNT_USD.to_string(),
        records.iter().map(|r| Some(r.amount_usd)).collect(),
    ));

    CorrelationMatrix::compute(&columns)
}
