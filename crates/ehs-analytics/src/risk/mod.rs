//! Risk model training over the incident table.
//!
//! The trainer is an explicit state machine with three exit states:
//!
//! - [`TrainingOutcome::NoSignal`]: neither a severity nor a likelihood
//!   column could be resolved;
//! - [`TrainingOutcome::DegenerateLabel`]: a label was derived but cannot
//!   support a stratified holdout (single class, or a class with fewer
//!   than two rows);
//! - [`TrainingOutcome::Trained`]: fitted, with held-out accuracy.
//!
//! Every exit produces a well-formed [`ModelMetrics`]; modeling problems
//! never abort the surrounding run.

pub mod features;
pub mod logistic;
pub mod split;

use crate::error::Result;
use crate::schema::{self, ColumnResolver};
use features::{FeatureTable, Preprocessor};
use logistic::LogisticRegression;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A row is high risk when severity or likelihood reaches this score.
pub const HIGH_RISK_THRESHOLD: f64 = 7.0;
/// Missing scores are treated as this value when deriving the label.
pub const MISSING_SCORE: f64 = 0.0;
pub const TEST_FRACTION: f64 = 0.25;
pub const SPLIT_SEED: u64 = 42;
pub const MAX_ITERATIONS: usize = 1000;
pub const MODEL_FAMILY: &str = "LogisticRegression";
pub const TARGET_NAME: &str = "high_risk";

/// Model metrics reported in the summary document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub enabled: bool,
    pub model: String,
    pub target: String,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl ModelMetrics {
    /// Well-formed record for a run where training was skipped.
    pub fn disabled(rows: usize) -> Self {
        Self {
            enabled: false,
            model: MODEL_FAMILY.to_string(),
            target: TARGET_NAME.to_string(),
            rows,
            accuracy: None,
        }
    }

    fn trained(rows: usize, accuracy: f64) -> Self {
        Self {
            enabled: true,
            model: MODEL_FAMILY.to_string(),
            target: TARGET_NAME.to_string(),
            rows,
            accuracy: Some(accuracy),
        }
    }
}

/// Exit state of one trainer run.
#[derive(Debug, Clone, PartialEq)]
pub enum TrainingOutcome {
    NoSignal { rows: usize },
    DegenerateLabel { rows: usize },
    Trained { rows: usize, accuracy: f64 },
}

impl From<TrainingOutcome> for ModelMetrics {
    fn from(outcome: TrainingOutcome) -> Self {
        match outcome {
            TrainingOutcome::NoSignal { rows } | TrainingOutcome::DegenerateLabel { rows } => {
                ModelMetrics::disabled(rows)
            }
            TrainingOutcome::Trained { rows, accuracy } => ModelMetrics::trained(rows, accuracy),
        }
    }
}

/// Derive the binary high-risk label from the score columns.
pub fn derive_labels(severity: &[Option<f64>], likelihood: &[Option<f64>]) -> Vec<u8> {
    severity
        .iter()
        .zip(likelihood)
        .map(|(sev, like)| {
            let high = sev.unwrap_or(MISSING_SCORE) >= HIGH_RISK_THRESHOLD
                || like.unwrap_or(MISSING_SCORE) >= HIGH_RISK_THRESHOLD;
            high as u8
        })
        .collect()
}

/// Run the trainer state machine over the incident table.
pub fn evaluate(df: &DataFrame) -> Result<TrainingOutcome> {
    let rows = df.height();
    let resolver = ColumnResolver::new(df);
    let severity_col = resolver.resolve(schema::SEVERITY);
    let likelihood_col = resolver.resolve(schema::LIKELIHOOD);

    if severity_col.is_none() && likelihood_col.is_none() {
        debug!("No severity or likelihood column; skipping risk model");
        return Ok(TrainingOutcome::NoSignal { rows });
    }

    let severity = match severity_col {
        Some(col) => features::numeric_values(df, col)?,
        None => vec![None; rows],
    };
    let likelihood = match likelihood_col {
        Some(col) => features::numeric_values(df, col)?,
        None => vec![None; rows],
    };

    let labels = derive_labels(&severity, &likelihood);
    let positives = labels.iter().filter(|&&label| label == 1).count();
    let negatives = rows - positives;
    if positives < 2 || negatives < 2 {
        debug!(
            "Label too imbalanced to hold out ({} high risk / {} rows); skipping risk model",
            positives, rows
        );
        return Ok(TrainingOutcome::DegenerateLabel { rows });
    }

    let mut numeric_cols: Vec<&str> = Vec::new();
    if let Some(col) = severity_col {
        numeric_cols.push(col);
    }
    if let Some(col) = likelihood_col
        && !numeric_cols.contains(&col)
    {
        numeric_cols.push(col);
    }
    let mut categorical_cols: Vec<&str> = Vec::new();
    for &name in schema::RISK_CATEGORICALS {
        if resolver.contains(name)
            && !numeric_cols.contains(&name)
            && !categorical_cols.contains(&name)
        {
            categorical_cols.push(name);
        }
    }

    let table = FeatureTable::from_dataframe(df, &numeric_cols, &categorical_cols)?;
    let (train_rows, test_rows) = split::stratified_split(&labels, TEST_FRACTION, SPLIT_SEED);

    let preprocessor = Preprocessor::fit(&table, &train_rows);
    let x_train = preprocessor.transform(&table, &train_rows);
    let y_train: Vec<u8> = train_rows.iter().map(|&i| labels[i]).collect();
    let x_test = preprocessor.transform(&table, &test_rows);
    let y_test: Vec<u8> = test_rows.iter().map(|&i| labels[i]).collect();

    let mut model = LogisticRegression::new(MAX_ITERATIONS);
    model.fit(&x_train, &y_train);
    let accuracy = model.accuracy(&x_test, &y_test);

    info!(
        "Risk model trained on {} rows ({} encoded features), holdout accuracy {:.3}",
        rows,
        preprocessor.width(),
        accuracy
    );
    Ok(TrainingOutcome::Trained { rows, accuracy })
}

/// Train the risk model, reporting a disabled result instead of failing.
pub fn train_risk_model(df: &DataFrame) -> Result<ModelMetrics> {
    evaluate(df).map(ModelMetrics::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Incidents with severity spanning both sides of the threshold.
    fn trainable_incidents() -> DataFrame {
        let severities: Vec<i64> = (0..40).map(|i| if i % 4 == 0 { 9 } else { 2 }).collect();
        let categories: Vec<&str> = (0..40)
            .map(|i| if i % 2 == 0 { "Slip" } else { "Fall" })
            .collect();
        df![
            "Severity" => severities,
            "Category" => categories,
        ]
        .unwrap()
    }

    #[test]
    fn test_derive_labels_threshold_and_zero_fill() {
        let severity = vec![Some(7.0), Some(6.9), None, None];
        let likelihood = vec![None, None, Some(8.0), None];
        assert_eq!(derive_labels(&severity, &likelihood), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_no_signal_without_score_columns() {
        let df = df![
            "Category" => ["Slip", "Fall", "Slip"],
        ]
        .unwrap();

        let outcome = evaluate(&df).unwrap();
        assert_eq!(outcome, TrainingOutcome::NoSignal { rows: 3 });

        let metrics = ModelMetrics::from(outcome);
        assert!(!metrics.enabled);
        assert_eq!(metrics.rows, 3);
        assert_eq!(metrics.accuracy, None);
    }

    #[test]
    fn test_degenerate_when_all_below_threshold() {
        let df = df![
            "Severity" => [1i64, 2, 3, 4, 5, 6],
        ]
        .unwrap();

        let outcome = evaluate(&df).unwrap();
        assert_eq!(outcome, TrainingOutcome::DegenerateLabel { rows: 6 });
    }

    #[test]
    fn test_degenerate_when_minority_class_has_one_row() {
        let df = df![
            "Severity" => [9i64, 1, 2, 3, 4],
        ]
        .unwrap();

        let outcome = evaluate(&df).unwrap();
        assert_eq!(outcome, TrainingOutcome::DegenerateLabel { rows: 5 });
    }

    #[test]
    fn test_trained_on_spanning_severities() {
        let df = trainable_incidents();
        let outcome = evaluate(&df).unwrap();

        match outcome {
            TrainingOutcome::Trained { rows, accuracy } => {
                assert_eq!(rows, 40);
                assert!((0.0..=1.0).contains(&accuracy));
                // Severity alone separates the label; the fit should be strong.
                assert!(accuracy >= 0.9);
            }
            other => panic!("expected Trained, got {:?}", other),
        }
    }

    #[test]
    fn test_training_is_reproducible() {
        let df = trainable_incidents();
        let first = evaluate(&df).unwrap();
        let second = evaluate(&df).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_trained_metrics_shape() {
        let metrics = train_risk_model(&trainable_incidents()).unwrap();
        assert!(metrics.enabled);
        assert_eq!(metrics.model, MODEL_FAMILY);
        assert_eq!(metrics.target, TARGET_NAME);
        assert_eq!(metrics.rows, 40);
        assert!(metrics.accuracy.is_some());
    }

    #[test]
    fn test_likelihood_only_signal() {
        let likelihoods: Vec<i64> = (0..20).map(|i| if i < 10 { 8 } else { 3 }).collect();
        let df = df!["likelihoodScore" => likelihoods].unwrap();

        let outcome = evaluate(&df).unwrap();
        assert!(matches!(outcome, TrainingOutcome::Trained { rows: 20, .. }));
    }
}
