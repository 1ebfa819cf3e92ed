//! Column decoders turning polars series into plain Rust vectors.
//!
//! All decoders return one `Option` per row; a value that cannot be
//! represented becomes `None` rather than failing the whole column.

use crate::error::DatasetError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use polars::prelude::*;

/// Accepted textual timestamp layouts, tried in order.
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];
const DATE_FORMAT: &str = "%Y-%m-%d";

fn unsupported(series: &Series) -> DatasetError {
    DatasetError::UnsupportedColumnType {
        column: series.name().to_string(),
        dtype: series.dtype().to_string(),
    }
}

/// Looks up a column that the table is required to have.
pub fn required<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series, DatasetError> {
    df.column(name)
        .map_err(|_| DatasetError::MissingColumn(name.to_string()))
}

/// Decodes a temporal column into naive wall-clock timestamps.
///
/// Accepts native `Datetime` (any unit), `Date` (midnight) and string
/// columns. Zone-aware datetimes are read as wall-clock time in their zone;
/// zone-less ones as stored.
pub fn datetimes(series: &Series) -> Result<Vec<Option<NaiveDateTime>>, DatasetError> {
    match series.dtype() {
        DataType::Datetime(unit, zone) => {
            let unit = *unit;
            let zone = zone.as_deref().map(parse_zone).transpose()?;
            let raw = series.cast(&DataType::Int64)?;
            Ok(raw
                .i64()?
                .into_iter()
                .map(|v| {
                    let instant = from_epoch(v?, unit)?;
                    Some(match &zone {
                        Some(zone) => zone.wall_clock(instant),
                        None => instant.naive_utc(),
                    })
                })
                .collect())
        }
        DataType::Date => {
            let raw = series.cast(&DataType::Int32)?;
            Ok(raw
                .i32()?
                .into_iter()
                .map(|v| v.and_then(from_epoch_days).map(|d| d.and_time(NaiveTime::MIN)))
                .collect())
        }
        DataType::String => Ok(series
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_timestamp))
            .collect()),
        _ => Err(unsupported(series)),
    }
}

/// Decodes a temporal column and truncates each value to its calendar date.
pub fn dates(series: &Series) -> Result<Vec<Option<NaiveDate>>, DatasetError> {
    Ok(datetimes(series)?
        .into_iter()
        .map(|v| v.map(|ts| ts.date()))
        .collect())
}

/// Decodes any column as text. Numeric identifiers are formatted by polars.
pub fn strings(series: &Series) -> Result<Vec<Option<String>>, DatasetError> {
    let text = series.cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_owned))
        .collect())
}

/// Decodes a numeric column as `f64`.
pub fn floats(series: &Series) -> Result<Vec<Option<f64>>, DatasetError> {
    if !series.dtype().is_numeric() {
        return Err(unsupported(series));
    }
    let values = series.cast(&DataType::Float64)?;
    Ok(values.f64()?.into_iter().collect())
}

/// Decodes a flag column. Numeric flags are true when non-zero.
pub fn flags(series: &Series) -> Result<Vec<Option<bool>>, DatasetError> {
    match series.dtype() {
        DataType::Boolean => Ok(series.bool()?.into_iter().collect()),
        dtype if dtype.is_numeric() => Ok(floats(series)?
            .into_iter()
            .map(|v| v.map(|v| v != 0.0))
            .collect()),
        _ => Err(unsupported(series)),
    }
}

/// Time zone attached to a polars `Datetime` column.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Zone {
    Named(Tz),
    Fixed(FixedOffset),
}

impl Zone {
    fn wall_clock(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            Zone::Named(tz) => instant.with_timezone(tz).naive_local(),
            Zone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }
}

/// Polars stores either an IANA name or a fixed offset such as `+03:00`.
fn parse_zone(name: &str) -> Result<Zone, DatasetError> {
    if let Ok(tz) = name.parse::<Tz>() {
        return Ok(Zone::Named(tz));
    }
    name.parse::<FixedOffset>()
        .map(Zone::Fixed)
        .map_err(|_| DatasetError::UnknownTimeZone(name.to_string()))
}

fn from_epoch(value: i64, unit: TimeUnit) -> Option<DateTime<Utc>> {
    let per_second: i64 = match unit {
        TimeUnit::Nanoseconds => 1_000_000_000,
        TimeUnit::Microseconds => 1_000_000,
        TimeUnit::Milliseconds => 1_000,
    };
    let secs = value.div_euclid(per_second);
    let nanos = value.rem_euclid(per_second) * (1_000_000_000 / per_second);
    DateTime::from_timestamp(secs, nanos as u32)
}

fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(1970, 1, 1)?.checked_add_signed(chrono::Duration::days(days.into()))
}

/// Parses the timestamp layouts found in exported transaction data.
///
/// Offsets in RFC 3339 strings are kept as local wall-clock time.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_local());
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}
