//! Typed values read back from the store for comparison.

use chrono::{DateTime, NaiveDate, NaiveTime};
use duckdb::types::{TimeUnit, ValueRef};
use rust_decimal::Decimal;
use std::fmt;

/// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// A row as an ordered sequence of (column, value) pairs
pub type ComparableRow = Vec<(String, CellValue)>;

/// One value of a result row.
///
/// Integer widths collapse into `Int` so that values compare by number, not
/// by the width the store picked. Temporal values are normalized to
/// microseconds.
#[derive(Debug, Clone)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i128),
    Float(f64),
    Decimal(Decimal),
    Text(String),
    Blob(Vec<u8>),
    /// Days since 1970-01-01
    Date(i32),
    /// Microseconds since midnight
    Time(i64),
    /// Microseconds since the Unix epoch
    Timestamp(i64),
    Interval {
        months: i32,
        days: i32,
        nanos: i64,
    },
    /// Nested and other types, kept in their debug rendering
    Other(String),
}

fn to_micros(unit: TimeUnit, value: i64) -> i64 {
    match unit {
        TimeUnit::Second => value.saturating_mul(1_000_000),
        TimeUnit::Millisecond => value.saturating_mul(1_000),
        TimeUnit::Microsecond => value,
        TimeUnit::Nanosecond => value / 1_000,
    }
}

impl From<ValueRef<'_>> for CellValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => CellValue::Null,
            ValueRef::Boolean(b) => CellValue::Bool(b),
            ValueRef::TinyInt(n) => CellValue::Int(n.into()),
            ValueRef::SmallInt(n) => CellValue::Int(n.into()),
            ValueRef::Int(n) => CellValue::Int(n.into()),
            ValueRef::BigInt(n) => CellValue::Int(n.into()),
            ValueRef::HugeInt(n) => CellValue::Int(n),
            ValueRef::UTinyInt(n) => CellValue::Int(n.into()),
            ValueRef::USmallInt(n) => CellValue::Int(n.into()),
            ValueRef::UInt(n) => CellValue::Int(n.into()),
            ValueRef::UBigInt(n) => CellValue::Int(n.into()),
            ValueRef::Float(f) => CellValue::Float(f.into()),
            ValueRef::Double(f) => CellValue::Float(f),
            ValueRef::Decimal(d) => CellValue::Decimal(d),
            ValueRef::Text(s) => CellValue::Text(String::from_utf8_lossy(s).into_owned()),
            ValueRef::Blob(b) => CellValue::Blob(b.to_vec()),
            ValueRef::Date32(days) => CellValue::Date(days),
            ValueRef::Time64(unit, t) => CellValue::Time(to_micros(unit, t)),
            ValueRef::Timestamp(unit, ts) => CellValue::Timestamp(to_micros(unit, ts)),
            ValueRef::Interval {
                months,
                days,
                nanos,
            } => CellValue::Interval {
                months,
                days,
                nanos,
            },
            other => CellValue::Other(format!("{:?}", other)),
        }
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => (a.is_nan() && b.is_nan()) || a == b,
            (Decimal(a), Decimal(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Blob(a), Blob(b)) => a == b,
            (Date(a), Date(b)) => a == b,
            (Time(a), Time(b)) => a == b,
            (Timestamp(a), Timestamp(b)) => a == b,
            (
                Interval {
                    months: m1,
                    days: d1,
                    nanos: n1,
                },
                Interval {
                    months: m2,
                    days: d2,
                    nanos: n2,
                },
            ) => m1 == m2 && d1 == d2 && n1 == n2,
            (Other(a), Other(b)) => a == b,
            _ => false,
        }
    }
}

impl CellValue {
    /// Plain rendering used when writing values back into a sheet.
    ///
    /// NULL becomes the empty cell, which loads back as NULL.
    pub fn to_cell_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Text(s) => s.clone(),
            other => other.render(),
        }
    }

    fn render(&self) -> String {
        match self {
            CellValue::Null => "NULL".to_string(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Decimal(d) => d.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Blob(bytes) => bytes.iter().map(|b| format!("\\x{:02X}", b)).collect(),
            CellValue::Date(days) => {
                match NaiveDate::from_num_days_from_ce_opt(UNIX_EPOCH_DAYS_FROM_CE + days) {
                    Some(date) => date.format("%Y-%m-%d").to_string(),
                    None => days.to_string(),
                }
            }
            CellValue::Time(micros) => {
                let secs = (micros / 1_000_000) as u32;
                let nanos = ((micros % 1_000_000) * 1000) as u32;
                match NaiveTime::from_num_seconds_from_midnight_opt(secs, nanos) {
                    Some(time) => time.format("%H:%M:%S%.f").to_string(),
                    None => micros.to_string(),
                }
            }
            CellValue::Timestamp(micros) => match DateTime::from_timestamp_micros(*micros) {
                Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
                None => micros.to_string(),
            },
            CellValue::Interval {
                months,
                days,
                nanos,
            } => format!("{} months {} days {} ns", months, days, nanos),
            CellValue::Other(s) => s.clone(),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{:?}", s),
            other => f.write_str(&other.render()),
        }
    }
}
