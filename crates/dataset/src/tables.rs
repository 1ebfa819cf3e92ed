use crate::columns;
use crate::error::DatasetError;
use crate::schema;
use core_types::{ExchangeRates, FeatureColumn, RateRow, Transaction, TransactionTable};
use polars::prelude::*;

/// Decodes a transaction frame into a `TransactionTable`.
///
/// Besides the named fields, every numeric column is captured as a
/// correlation feature in frame order (this includes `amount`). Boolean
/// columns such as `is_fraud` are not numeric features.
pub fn decode_transactions(df: &DataFrame) -> Result<TransactionTable, DatasetError> {
    let timestamps = columns::datetimes(columns::required(df, schema::TIMESTAMP)?)?;
    let currencies = columns::strings(columns::required(df, schema::CURRENCY)?)?;
    let amounts = columns::floats(columns::required(df, schema::AMOUNT)?)?;
    let customers = columns::strings(columns::required(df, schema::CUSTOMER_ID)?)?;
    let vendors = columns::strings(columns::required(df, schema::VENDOR)?)?;
    let categories = columns::strings(columns::required(df, schema::VENDOR_CATEGORY)?)?;
    let countries = columns::strings(columns::required(df, schema::COUNTRY)?)?;
    let frauds = columns::flags(columns::required(df, schema::IS_FRAUD)?)?;

    let unparsed = timestamps.iter().filter(|ts| ts.is_none()).count();
    if unparsed > 0 {
        tracing::debug!(rows = unparsed, "Transactions without a usable timestamp.");
    }

    // Every column comes from the same frame, so they share one length.
    let mut currencies = currencies.into_iter();
    let mut amounts = amounts.into_iter();
    let mut customers = customers.into_iter();
    let mut vendors = vendors.into_iter();
    let mut categories = categories.into_iter();
    let mut countries = countries.into_iter();
    let mut frauds = frauds.into_iter();

    let records: Vec<Transaction> = timestamps
        .into_iter()
        .map(|timestamp| Transaction {
            timestamp,
            currency: currencies.next().flatten(),
            amount: amounts.next().flatten(),
            customer_id: customers.next().flatten(),
            vendor: vendors.next().flatten(),
            vendor_category: categories.next().flatten(),
            country: countries.next().flatten(),
            is_fraud: frauds.next().flatten(),
        })
        .collect();

    let mut features = Vec::new();
    for series in df.get_columns() {
        if series.dtype().is_numeric() {
            features.push(FeatureColumn {
                name: series.name().to_string(),
                values: columns::floats(series)?,
            });
        }
    }

    Ok(TransactionTable::new(records, features)?)
}

/// Decodes the exchange-rate frame.
///
/// Every numeric column other than `date` is a currency rate column named by
/// its currency code. Rows whose date cannot be decoded can never match a
/// transaction and are skipped.
pub fn decode_exchange_rates(df: &DataFrame) -> Result<ExchangeRates, DatasetError> {
    let dates = columns::dates(columns::required(df, schema::DATE)?)?;

    let mut currencies = Vec::new();
    let mut rate_columns = Vec::new();
    for series in df.get_columns() {
        if series.name() == schema::DATE {
            continue;
        }
        if !series.dtype().is_numeric() {
            tracing::debug!(column = series.name(), "Skipping non-numeric column in rate table.");
            continue;
        }
        currencies.push(series.name().to_string());
        rate_columns.push(columns::floats(series)?);
    }

    let mut rows = Vec::with_capacity(dates.len());
    for (idx, date) in dates.into_iter().enumerate() {
        let Some(date) = date else { continue };
        let mut row = RateRow::new(date);
        for (currency, values) in currencies.iter().zip(&rate_columns) {
            if let Some(rate) = values[idx] {
                row.rates.insert(currency.clone(), rate);
            }
        }
        rows.push(row);
    }

    Ok(ExchangeRates::new(currencies, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn transactions_frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new("transaction_id", &["T1", "T2", "T3"]),
            Series::new("timestamp", &[Some("2024-01-01 08:00:00"), Some("bad"), None]),
            Series::new("currency", &["EUR", "GBP", "USD"]),
            Series::new("amount", &[Some(100.0), Some(20.0), None]),
            Series::new("customer_id", &["C1", "C1", "C2"]),
            Series::new("vendor", &["V1", "V2", "V2"]),
            Series::new("vendor_category", &["Travel", "Retail", "Retail"]),
            Series::new("country", &["Germany", "UK", "USA"]),
            Series::new("is_fraud", &[Some(true), Some(false), None]),
            Series::new("card_number", &[1111i64, 2222, 3333]),
        ])
        .unwrap()
    }

    #[test]
    fn decodes_fields_and_keeps_nulls() {
        let table = decode_transactions(&transactions_frame()).unwrap();
        assert_eq!(table.len(), 3);

        let records = table.records();
        assert_eq!(records[0].amount, Some(100.0));
        assert_eq!(records[0].vendor_category.as_deref(), Some("Travel"));
        assert_eq!(records[1].timestamp, None);
        assert_eq!(records[2].amount, None);
        assert_eq!(records[2].is_fraud, None);
    }

    #[test]
    fn each_record_keeps_its_own_row() {
        let table = decode_transactions(&transactions_frame()).unwrap();
        let second = &table.records()[1];
        assert_eq!(second.currency.as_deref(), Some("GBP"));
        assert_eq!(second.amount, Some(20.0));
        assert_eq!(second.customer_id.as_deref(), Some("C1"));
        assert_eq!(second.vendor.as_deref(), Some("V2"));
        assert_eq!(second.vendor_category.as_deref(), Some("Retail"));
        assert_eq!(second.country.as_deref(), Some("UK"));
        assert_eq!(second.is_fraud, Some(false));

        let last = &table.records()[2];
        assert_eq!(last.currency.as_deref(), Some("USD"));
        assert_eq!(last.customer_id.as_deref(), Some("C2"));
        assert_eq!(last.country.as_deref(), Some("USA"));
    }

    #[test]
    fn numeric_columns_become_features_in_frame_order() {
        let table = decode_transactions(&transactions_frame()).unwrap();
        let names: Vec<&str> = table.features().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["amount", "card_number"]);
        assert_eq!(table.features()[1].values[2], Some(3333.0));
    }

    #[test]
    fn missing_required_column_is_reported_by_name() {
        let df = transactions_frame().drop("country").unwrap();
        let err = decode_transactions(&df).unwrap_err();
        assert!(matches!(err, DatasetError::MissingColumn(name) if name == "country"));
    }

    #[test]
    fn rate_table_skips_non_numeric_columns_and_null_dates() {
        let df = DataFrame::new(vec![
            Series::new("date", &[Some("2024-01-01"), None]),
            Series::new("source", &["ecb", "ecb"]),
            Series::new("EUR", &[Some(0.9), Some(0.8)]),
            Series::new("JPY", &[None, Some(140.0)]),
        ])
        .unwrap();

        let rates = decode_exchange_rates(&df).unwrap();
        assert_eq!(rates.currencies(), ["EUR".to_string(), "JPY".to_string()]);
        assert_eq!(rates.rows().len(), 1);

        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let row = rates.rows_for(day).next().unwrap();
        assert_eq!(row.rate("EUR"), Some(0.9));
        assert_eq!(row.rate("JPY"), None);
    }
}
