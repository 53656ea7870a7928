//! Logical field resolution over variably-named columns.
//!
//! Uploaded CSVs name the same logical field differently across sources
//! ("Severity" vs "severityScore" vs "Severity Score"). Instead of
//! hardcoding one canonical name, every downstream lookup goes through a
//! prioritized alias list: the first candidate present in the loaded table
//! wins, and absence is an ordinary `None`, never an error.

use polars::prelude::*;

/// Aliases for the free-text "action taken" field on observations.
pub const ACTION_TAKEN: &[&str] = &["Action Taken", "Action taken"];

/// Aliases for the observation type field.
pub const OBSERVATION_TYPE: &[&str] = &["Observation Type", "observationType", "Type"];

/// Aliases for the observation site/location field.
pub const OBSERVATION_SITE: &[&str] = &["Site / Location", "Site", "Location"];

/// Aliases for the incident date field, in priority order.
pub const INCIDENT_DATE: &[&str] = &["Incident Date", "Date", "incidentDate", "incident_date"];

/// Aliases for the incident severity score.
pub const SEVERITY: &[&str] = &["Severity", "severityScore", "Severity Score"];

/// Aliases for the incident likelihood score.
pub const LIKELIHOOD: &[&str] = &["Likelihood", "likelihoodScore", "Likelihood Score"];

/// Categorical columns considered as risk-model features when present.
pub const RISK_CATEGORICALS: &[&str] = &["Category", "Department", "Site / Project", "Location"];

/// Resolves logical fields against the columns of a loaded table.
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    names: Vec<String>,
}

impl ColumnResolver {
    pub fn new(df: &DataFrame) -> Self {
        Self {
            names: df
                .get_column_names()
                .iter()
                .map(|name| name.to_string())
                .collect(),
        }
    }

    /// Return the first alias present in the table, or `None`.
    pub fn resolve<'a>(&self, aliases: &'a [&'a str]) -> Option<&'a str> {
        aliases.iter().copied().find(|alias| self.contains(alias))
    }

    /// Whether the table has a column with exactly this name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}
