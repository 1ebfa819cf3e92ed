use crate::error::CoreError;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, HashMap, HashSet};

/// A single card transaction as it was read from storage.
///
/// Every field is optional because the source table may contain nulls; a row
/// missing its timestamp, currency or amount can never be normalized and is
/// dropped during the merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub timestamp: Option<NaiveDateTime>,
    pub currency: Option<String>,
    pub amount: Option<f64>,
    pub customer_id: Option<String>,
    pub vendor: Option<String>,
    pub vendor_category: Option<String>,
    pub country: Option<String>,
    pub is_fraud: Option<bool>,
}

impl Transaction {
    /// Calendar date of the transaction, used as the join key.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }

    /// Hour of day (0-23).
    pub fn hour(&self) -> Option<u32> {
        self.timestamp.map(|ts| ts.hour())
    }

    pub fn is_fraudulent(&self) -> bool {
        self.is_fraud.unwrap_or(false)
    }
}

/// A numeric column of the transaction table, kept column-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// All transactions plus the numeric columns needed for correlation analysis.
#[derive(Debug, Clone, Default)]
pub struct TransactionTable {
    records: Vec<Transaction>,
    features: Vec<FeatureColumn>,
}

impl TransactionTable {
    /// Builds the table, checking that every feature column is row-aligned.
    pub fn new(records: Vec<Transaction>, features: Vec<FeatureColumn>) -> Result<Self, CoreError> {
        for feature in &features {
            if feature.values.len() != records.len() {
                return Err(CoreError::LengthMismatch {
                    column: feature.name.clone(),
                    expected: records.len(),
                    actual: feature.values.len(),
                });
            }
        }
        Ok(Self { records, features })
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn features(&self) -> &[FeatureColumn] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// One day of exchange rates. Null rates are simply absent from the map.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub date: NaiveDate,
    pub rates: BTreeMap<String, f64>,
}

impl RateRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            rates: BTreeMap::new(),
        }
    }

    pub fn with_rate(mut self, currency: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(currency.into(), rate);
        self
    }

    /// The rate quoted for `currency` on this day, if any.
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }
}

/// The historical exchange-rate table, indexed by date.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRates {
    currencies: Vec<String>,
    rows: Vec<RateRow>,
    by_date: HashMap<NaiveDate, Vec<usize>>,
}

impl ExchangeRates {
    /// `currencies` lists the rate columns in table order.
    pub fn new(currencies: Vec<String>, rows: Vec<RateRow>) -> Result<Self, CoreError> {
        let mut seen = HashSet::new();
        for currency in &currencies {
            if !seen.insert(currency.as_str()) {
                return Err(CoreError::DuplicateCurrency(currency.clone()));
            }
        }

        let mut by_date: HashMap<NaiveDate, Vec<usize>> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            by_date.entry(row.date).or_default().push(idx);
        }

        Ok(Self {
            currencies,
            rows,
            by_date,
        })
    }

    pub fn currencies(&self) -> &[String] {
        &self.currencies
    }

    pub fn rows(&self) -> &[RateRow] {
        &self.rows
    }

    /// Every rate row recorded for `date`, in table order.
    ///
    /// Usually zero or one; duplicated dates yield several rows, exactly like
    /// a relational left join would.
    pub fn rows_for(&self, date: NaiveDate) -> impl Iterator<Item = &RateRow> + '_ {
        self.by_date
            .get(&date)
            .into_iter()
            .flatten()
            .map(move |&idx| &self.rows[idx])
    }
}

/// A transaction joined with its day's rates and carrying the normalized amount.
///
/// Only rows with a usable rate ever become a `MergedRecord`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRecord<'a> {
    /// Row position in the source `TransactionTable`.
    pub index: usize,
    pub transaction: &'a Transaction,
    pub rates: &'a RateRow,
    pub amount_usd: f64,
    pub hour: u32,
}
