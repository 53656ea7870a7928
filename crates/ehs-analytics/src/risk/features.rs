//! Feature extraction and preprocessing for the risk model.
//!
//! Numeric columns are coerced tolerantly (formatted strings like
//! "$1,234" parse; garbage becomes missing) and median-imputed.
//! Categorical columns are most-frequent-imputed and one-hot encoded,
//! with categories unseen at fit time encoding to an all-zero block.
//! All fit statistics come from the training partition only.

use crate::error::Result;
use polars::prelude::*;
use std::collections::HashMap;

/// Characters commonly used in numeric formatting that should be stripped.
const NUMERIC_FORMAT_CHARS: [char; 6] = [',', '$', '%', '€', '£', ' '];

/// Fill value for a categorical column with no observed training values.
const FALLBACK_CATEGORY: &str = "Unknown";

/// Clean a string for numeric parsing by removing formatting characters.
fn clean_numeric_string(s: &str) -> String {
    let mut result = s.trim().to_string();
    for c in NUMERIC_FORMAT_CHARS {
        result = result.replace(c, "");
    }
    result
}

/// Parse a raw cell as a number, or `None` when it is not numeric.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let cleaned = clean_numeric_string(raw);
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Coerce a column to numeric values, non-numeric entries becoming missing.
pub fn numeric_values(df: &DataFrame, column: &str) -> Result<Vec<Option<f64>>> {
    let series = df.column(column)?.as_materialized_series();

    if is_numeric_dtype(series.dtype()) || series.dtype() == &DataType::Boolean {
        let floats = series.cast(&DataType::Float64)?;
        return Ok(floats.f64()?.into_iter().collect());
    }
    if series.dtype() == &DataType::String {
        let ca = series.str()?;
        return Ok(ca.into_iter().map(|v| v.and_then(parse_numeric)).collect());
    }

    Ok(vec![None; series.len()])
}

/// Coerce a column to optional text values.
pub fn categorical_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    let text = df.column(column)?.as_materialized_series().cast(&DataType::String)?;
    Ok(text
        .str()?
        .into_iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

/// Raw (column-major, missing-preserving) feature values for all rows.
#[derive(Debug)]
pub struct FeatureTable {
    pub numeric_names: Vec<String>,
    pub numeric: Vec<Vec<Option<f64>>>,
    pub categorical_names: Vec<String>,
    pub categorical: Vec<Vec<Option<String>>>,
    pub rows: usize,
}

impl FeatureTable {
    pub fn from_dataframe(
        df: &DataFrame,
        numeric_cols: &[&str],
        categorical_cols: &[&str],
    ) -> Result<Self> {
        let mut numeric = Vec::with_capacity(numeric_cols.len());
        for col in numeric_cols {
            numeric.push(numeric_values(df, col)?);
        }
        let mut categorical = Vec::with_capacity(categorical_cols.len());
        for col in categorical_cols {
            categorical.push(categorical_values(df, col)?);
        }
        Ok(Self {
            numeric_names: numeric_cols.iter().map(|c| c.to_string()).collect(),
            numeric,
            categorical_names: categorical_cols.iter().map(|c| c.to_string()).collect(),
            categorical,
            rows: df.height(),
        })
    }
}

/// Imputation and encoding parameters learned from the training partition.
#[derive(Debug)]
pub struct Preprocessor {
    medians: Vec<f64>,
    modes: Vec<String>,
    /// Sorted known categories per categorical column.
    categories: Vec<Vec<String>>,
}

impl Preprocessor {
    /// Learn medians, modes, and category vocabularies from `train_rows`.
    pub fn fit(table: &FeatureTable, train_rows: &[usize]) -> Self {
        let medians = table
            .numeric
            .iter()
            .map(|column| {
                let mut observed: Vec<f64> = train_rows
                    .iter()
                    .filter_map(|&i| column[i])
                    .collect();
                median(&mut observed).unwrap_or(0.0)
            })
            .collect();

        let mut modes = Vec::with_capacity(table.categorical.len());
        let mut categories = Vec::with_capacity(table.categorical.len());
        for column in &table.categorical {
            let mode = string_mode(train_rows.iter().filter_map(|&i| column[i].as_deref()))
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

            let mut vocab: Vec<String> = train_rows
                .iter()
                .map(|&i| column[i].as_deref().unwrap_or(mode.as_str()).to_string())
                .collect();
            vocab.sort();
            vocab.dedup();

            modes.push(mode);
            categories.push(vocab);
        }

        Self {
            medians,
            modes,
            categories,
        }
    }

    /// Width of the encoded feature vectors.
    pub fn width(&self) -> usize {
        self.medians.len() + self.categories.iter().map(Vec::len).sum::<usize>()
    }

    /// Encode the given rows into dense feature vectors.
    pub fn transform(&self, table: &FeatureTable, rows: &[usize]) -> Vec<Vec<f64>> {
        rows.iter()
            .map(|&row| {
                let mut encoded = Vec::with_capacity(self.width());
                for (column, median) in table.numeric.iter().zip(&self.medians) {
                    encoded.push(column[row].unwrap_or(*median));
                }
                for ((column, mode), vocab) in table
                    .categorical
                    .iter()
                    .zip(&self.modes)
                    .zip(&self.categories)
                {
                    let value = column[row].as_deref().unwrap_or(mode);
                    let mut block = vec![0.0; vocab.len()];
                    if let Ok(pos) = vocab.binary_search_by(|known| known.as_str().cmp(value)) {
                        block[pos] = 1.0;
                    }
                    encoded.extend(block);
                }
                encoded
            })
            .collect()
    }
}

/// Median of the observed values, averaging the middle pair for even counts.
fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

/// Most frequent value; ties broken by first occurrence.
fn string_mode<'a>(values: impl Iterator<Item = &'a str>) -> Option<String> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, value) in values.enumerate() {
        let entry = counts.entry(value).or_insert((0, position));
        entry.0 += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.0.cmp(&b.1.0).then_with(|| b.1.1.cmp(&a.1.1)))
        .map(|(value, _)| value.to_string())
}
