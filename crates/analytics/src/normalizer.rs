use core_types::{ExchangeRates, MergedRecord, RateRow, Transaction, TransactionTable};

/// Converts `amount` into USD using the rate quoted for `currency` in `rates`.
///
/// Returns `None` when the currency has no rate column, the rate is null,
/// zero or NaN, or the quotient is not a number. All of those cases are
/// treated the same: the row cannot be normalized.
pub fn normalize_amount(currency: &str, amount: f64, rates: &RateRow) -> Option<f64> {
    let rate = rates.rate(currency)?;
    if rate == 0.0 || rate.is_nan() {
        return None;
    }
    let normalized = amount / rate;
    (!normalized.is_nan()).then_some(normalized)
}

/// The outcome of joining transactions with the rate table.
#[derive(Debug, Clone, Default)]
pub struct Normalized<'a> {
    /// Rows that were normalized, in transaction-table order.
    pub records: Vec<MergedRecord<'a>>,
    /// Joined rows that had no usable rate and were discarded.
    pub dropped: usize,
}

impl Normalized<'_> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Left-joins every transaction with the rate rows of its calendar date and
/// keeps only the pairs that normalize.
///
/// A transaction without a rate row for its date counts as one dropped row.
/// A date listed several times in the rate table pairs the transaction with
/// each of those rows.
pub fn merge<'a>(table: &'a TransactionTable, rates: &'a ExchangeRates) -> Normalized<'a> {
    let mut merged = Normalized {
        records: Vec::with_capacity(table.len()),
        dropped: 0,
    };

    for (index, transaction) in table.records().iter().enumerate() {
        let Some(date) = transaction.date() else {
            merged.dropped += 1;
            continue;
        };

        let mut matched = false;
        for row in rates.rows_for(date) {
            matched = true;
            match merge_row(index, transaction, row) {
                Some(record) => merged.records.push(record),
                None => merged.dropped += 1,
            }
        }
        if !matched {
            merged.dropped += 1;
        }
    }

    merged
}

fn merge_row<'a>(
    index: usize,
    transaction: &'a Transaction,
    rates: &'a RateRow,
) -> Option<MergedRecord<'a>> {
    let currency = transaction.currency.as_deref()?;
    let amount = transaction.amount?;
    let hour = transaction.hour()?;
    let amount_usd = normalize_amount(currency, amount, rates)?;
    Some(MergedRecord {
        index,
        transaction,
        rates,
        amount_usd,
        hour,
    })
}
