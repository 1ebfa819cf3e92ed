use crate::correlation::CorrelationMatrix;
use crate::distribution::Histogram;

/// Every aggregate computed from the merged table in one run.
///
/// This struct is the final output of the `AnalyticsEngine` and the only
/// input of the chart renderer and the text report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetSummary {
    // I. Scalar statistics
    pub total_transactions: usize,
    pub fraud_count: usize,
    /// `fraud_count / total_transactions * 100`; zero for an empty table.
    pub fraud_pct: f64,
    pub unique_customers: usize,
    pub unique_vendors: usize,
    /// Joined rows discarded because no usable exchange rate was found.
    pub dropped_rows: usize,

    // II. Grouped aggregates
    pub amount_histogram: Histogram,
    /// Most frequent countries, count descending.
    pub top_countries: Vec<RankedCount>,
    /// Share of fraudulent transactions per vendor category, rate descending.
    pub fraud_by_category: Vec<CategoryFraudRate>,
    /// Transactions per hour of day, ascending hour, only hours present.
    pub transactions_by_hour: Vec<HourCount>,

    // III. Feature relationships
    pub correlation: CorrelationMatrix,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFraudRate {
    pub category: String,
    /// Mean of the fraud flag, in `[0, 1]`.
    pub rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}
