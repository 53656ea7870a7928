//! Descriptive statistics over the loaded tables.
//!
//! Everything here degrades rather than errors: an absent column yields
//! the documented degraded result (all-open tally, empty frequency list,
//! empty time series), never a failure.

use crate::dates;
use crate::error::Result;
use crate::schema::{self, ColumnResolver};
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// How many of the most frequent categories a bar chart shows.
pub const TOP_CATEGORIES: usize = 10;

/// Open/closed breakdown of the observation table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenClosedTally {
    pub total: usize,
    pub open: usize,
    pub closed: usize,
}

/// Tally open vs. closed observations.
///
/// An observation is "closed" when its action-taken text is non-blank
/// after trimming, regardless of content ("N/A" counts as closed). With
/// no action-taken column every row is reported open.
pub fn open_closed_tally(df: &DataFrame) -> Result<OpenClosedTally> {
    let total = df.height();
    let resolver = ColumnResolver::new(df);
    let Some(action_col) = resolver.resolve(schema::ACTION_TAKEN) else {
        debug!("No action-taken column; reporting all {} observations open", total);
        return Ok(OpenClosedTally {
            total,
            open: total,
            closed: 0,
        });
    };

    let text = df.column(action_col)?.as_materialized_series().cast(&DataType::String)?;
    let closed = text
        .str()?
        .into_iter()
        .filter(|value| value.is_some_and(|s| !s.trim().is_empty()))
        .count();

    Ok(OpenClosedTally {
        total,
        open: total - closed,
        closed,
    })
}

/// Count value frequencies in a column, keeping the `top_n` most frequent.
///
/// The result is sorted ascending by count (ties broken by name) so a
/// horizontal bar chart draws the largest bar at the top. An absent or
/// entirely-null column yields an empty list.
pub fn value_frequencies(df: &DataFrame, column: &str, top_n: usize) -> Result<Vec<(String, u64)>> {
    let Ok(col) = df.column(column) else {
        return Ok(Vec::new());
    };

    let text = col.as_materialized_series().drop_nulls().cast(&DataType::String)?;
    let mut counts: HashMap<String, u64> = HashMap::new();
    for value in text.str()?.into_iter().flatten() {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }

    let mut items: Vec<(String, u64)> = counts.into_iter().collect();
    items.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    items.truncate(top_n);
    items.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
    Ok(items)
}

/// Group a date column into daily occurrence counts, chronologically.
///
/// Unparseable entries are coerced to missing and dropped. Native date
/// and datetime columns are bucketed directly; everything else goes
/// through the tolerant string parser.
pub fn daily_counts(df: &DataFrame, column: &str) -> Result<Vec<(NaiveDate, u64)>> {
    let Ok(col) = df.column(column) else {
        return Ok(Vec::new());
    };
    let series = col.as_materialized_series();

    let mut counts: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    let native = match series.dtype() {
        DataType::Date => Some(series.clone()),
        DataType::Datetime(_, _) => Some(series.cast(&DataType::Date)?),
        _ => None,
    };

    if let Some(dates) = native {
        // Date columns are physically days since the Unix epoch.
        let days = dates.cast(&DataType::Int32)?;
        for value in days.i32()?.into_iter().flatten() {
            let date = NaiveDate::default() + Duration::days(value as i64);
            *counts.entry(date).or_insert(0) += 1;
        }
    } else {
        let text = series.cast(&DataType::String)?;
        for value in text.str()?.into_iter().flatten() {
            if let Some(date) = dates::parse_date(value) {
                *counts.entry(date).or_insert(0) += 1;
            }
        }
    }

    Ok(counts.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    // ========================================================================
    // open_closed_tally() tests
    // ========================================================================

    #[test]
    fn test_tally_blank_vs_nonblank_actions() {
        let df = df![
            "Action Taken" => ["", "closed on 3/1", "  ", "yes"],
        ]
        .unwrap();

        let tally = open_closed_tally(&df).unwrap();
        assert_eq!(tally.total, 4);
        assert_eq!(tally.closed, 2);
        assert_eq!(tally.open, 2);
    }

    #[test]
    fn test_tally_null_actions_are_open() {
        let df = df![
            "Action Taken" => [None, Some("done"), None],
        ]
        .unwrap();

        let tally = open_closed_tally(&df).unwrap();
        assert_eq!(tally.total, 3);
        assert_eq!(tally.closed, 1);
        assert_eq!(tally.open, 2);
    }

    #[test]
    fn test_tally_nonblank_counts_regardless_of_content() {
        // "N/A" is still a non-blank action note, so the row is closed.
        let df = df![
            "Action taken" => ["N/A", ""],
        ]
        .unwrap();

        let tally = open_closed_tally(&df).unwrap();
        assert_eq!(tally.closed, 1);
        assert_eq!(tally.open, 1);
    }

    #[test]
    fn test_tally_without_action_column_reports_all_open() {
        let df = df![
            "Observation Type" => ["PPE", "Housekeeping"],
        ]
        .unwrap();

        let tally = open_closed_tally(&df).unwrap();
        assert_eq!(tally.total, 2);
        assert_eq!(tally.open, 2);
        assert_eq!(tally.closed, 0);
    }

    // ========================================================================
    // value_frequencies() tests
    // ========================================================================

    #[test]
    fn test_frequencies_ascending_order() {
        let df = df![
            "Observation Type" => ["A", "A", "A", "B", "B", "C"],
        ]
        .unwrap();

        let counts = value_frequencies(&df, "Observation Type", TOP_CATEGORIES).unwrap();
        assert_eq!(
            counts,
            vec![
                ("C".to_string(), 1),
                ("B".to_string(), 2),
                ("A".to_string(), 3),
            ]
        );
    }

    #[test]
    fn test_frequencies_top_n_keeps_most_frequent() {
        let df = df![
            "Observation Type" => ["A", "A", "A", "B", "B", "C"],
        ]
        .unwrap();

        let counts = value_frequencies(&df, "Observation Type", 2).unwrap();
        assert_eq!(
            counts,
            vec![("B".to_string(), 2), ("A".to_string(), 3)]
        );
    }

    #[test]
    fn test_frequencies_drop_nulls() {
        let df = df![
            "Observation Type" => [Some("A"), None, Some("A"), None],
        ]
        .unwrap();

        let counts = value_frequencies(&df, "Observation Type", TOP_CATEGORIES).unwrap();
        assert_eq!(counts, vec![("A".to_string(), 2)]);
    }

    #[test]
    fn test_frequencies_absent_column_is_empty() {
        let df = df!["Other" => [1i64, 2]].unwrap();
        let counts = value_frequencies(&df, "Observation Type", TOP_CATEGORIES).unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_frequencies_coerce_numeric_to_text() {
        let df = df!["Site" => [3i64, 3, 7]].unwrap();
        let counts = value_frequencies(&df, "Site", TOP_CATEGORIES).unwrap();
        assert_eq!(counts, vec![("7".to_string(), 1), ("3".to_string(), 2)]);
    }

    // ========================================================================
    // daily_counts() tests
    // ========================================================================

    #[test]
    fn test_daily_counts_drops_unparseable() {
        let df = df![
            "Incident Date" => ["2024-01-01", "2024-01-01", "not-a-date", "2024-01-02"],
        ]
        .unwrap();

        let counts = daily_counts(&df, "Incident Date").unwrap();
        assert_eq!(
            counts,
            vec![(ymd(2024, 1, 1), 2), (ymd(2024, 1, 2), 1)]
        );
    }

    #[test]
    fn test_daily_counts_chronological_order() {
        let df = df![
            "Date" => ["2024-02-01", "2024-01-15", "2024-02-01", "2023-12-31"],
        ]
        .unwrap();

        let counts = daily_counts(&df, "Date").unwrap();
        let dates: Vec<NaiveDate> = counts.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![ymd(2023, 12, 31), ymd(2024, 1, 15), ymd(2024, 2, 1)]
        );
        assert_eq!(counts[2].1, 2);
    }

    #[test]
    fn test_daily_counts_all_unparseable_is_empty() {
        let df = df![
            "Incident Date" => ["soon", "tbd"],
        ]
        .unwrap();

        let counts = daily_counts(&df, "Incident Date").unwrap();
        assert!(counts.is_empty());
    }

    #[test]
    fn test_daily_counts_absent_column_is_empty() {
        let df = df!["Severity" => [1i64]].unwrap();
        let counts = daily_counts(&df, "Incident Date").unwrap();
        assert!(counts.is_empty());
    }
}
