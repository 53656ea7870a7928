//! The summary document consumed by the web dashboard.
//!
//! Assembled incrementally as the pipeline stages complete, then written
//! once as indented UTF-8 JSON. Field names are camelCase on the wire.

use crate::analytics::OpenClosedTally;
use crate::error::Result;
use crate::risk::ModelMetrics;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "summary.json";

const OBSERVATIONS_MISSING_NOTE: &str = "Observations CSV not found";
const INCIDENTS_MISSING_NOTE: &str = "Incidents CSV not found";

/// The aggregate output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub generated_at: String,
    pub sources: SourcePaths,
    pub observations: ObservationsSection,
    pub incidents: IncidentsSection,
    pub model: ModelMetrics,
    pub assets: AssetPaths,
}

/// Resolved input paths, echoed for provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub observations: String,
    pub incidents: String,
}

/// Observation statistics, or the degraded zero-row segment.
///
/// `Missing` must precede `Present`: untagged deserialization ignores
/// unknown fields, so the variant carrying `note` has to be tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ObservationsSection {
    Missing {
        rows: usize,
        note: String,
    },
    Present {
        rows: usize,
        total: usize,
        open: usize,
        closed: usize,
    },
}

impl ObservationsSection {
    pub fn present(rows: usize, tally: OpenClosedTally) -> Self {
        Self::Present {
            rows,
            total: tally.total,
            open: tally.open,
            closed: tally.closed,
        }
    }

    pub fn missing() -> Self {
        Self::Missing {
            rows: 0,
            note: OBSERVATIONS_MISSING_NOTE.to_string(),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Self::Missing { rows, .. } | Self::Present { rows, .. } => *rows,
        }
    }
}

/// Incident row count, or the degraded zero-row segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IncidentsSection {
    Missing { rows: usize, note: String },
    Present { rows: usize },
}

impl IncidentsSection {
    pub fn present(rows: usize) -> Self {
        Self::Present { rows }
    }

    pub fn missing() -> Self {
        Self::Missing {
            rows: 0,
            note: INCIDENTS_MISSING_NOTE.to_string(),
        }
    }

    pub fn rows(&self) -> usize {
        match self {
            Self::Missing { rows, .. } | Self::Present { rows } => *rows,
        }
    }
}

/// Asset URLs, present only for images actually produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations_by_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations_by_site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incidents_over_time: Option<String>,
}

impl AssetPaths {
    pub fn is_empty(&self) -> bool {
        self.observations_by_type.is_none()
            && self.observations_by_site.is_none()
            && self.incidents_over_time.is_none()
    }
}

/// ISO-8601 UTC generation timestamp with a trailing "Z".
pub fn generation_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Write the summary document as indented JSON, overwriting any prior run.
pub fn write_summary(summary: &DashboardSummary, output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SUMMARY_FILE);
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(&path, json)?;
    Ok(path)
}
