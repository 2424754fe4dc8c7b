use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;

use crate::join::string_column;

/// Name of the derived weekday column.
pub const ORDER_DAY: &str = "order_day";

/// Timestamp layouts accepted, tried in order.
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse `"YYYY-MM-DD HH:MM:SS"` (or a close variant, or a bare date).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// Full English weekday name, e.g. "Monday".
pub fn weekday_name(ts: &NaiveDateTime) -> String {
    ts.format("%A").to_string()
}

/// Append an `order_day` column holding the weekday of `source_column`.
///
/// Null timestamps stay null. Any unparsable value fails the whole frame.
pub fn with_order_day(df: &DataFrame, source_column: &str) -> Result<DataFrame> {
    let stamps = string_column(df, source_column)?;

    let mut days: Vec<Option<String>> = Vec::with_capacity(stamps.len());
    for (row, stamp) in stamps.into_iter().enumerate() {
        let day = match stamp {
            Some(raw) => {
                let ts = parse_timestamp(raw).ok_or_else(|| {
                    anyhow!("row {}: cannot parse {} value {:?}", row, source_column, raw)
                })?;
                Some(weekday_name(&ts))
            }
            None => None,
        };
        days.push(day);
    }

    let mut out = df.clone();
    out.with_column(Series::new(ORDER_DAY.into(), days))
        .context("appending order_day column")?;
    Ok(out)
}
