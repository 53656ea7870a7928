//! Dashboard Analytics Asset Generator
//!
//! A batch tool that ingests safety observation and incident CSVs,
//! computes descriptive statistics, renders chart images, optionally fits
//! a "high risk" classifier, and writes a single JSON summary consumed by
//! a separate web dashboard.
//!
//! # Overview
//!
//! - **Adaptive schema detection**: logical fields ("the severity
//!   column") resolve against prioritized alias lists, so the same code
//!   path tolerates naming drift across uploaded files.
//! - **Descriptive analytics**: open/closed tallies, categorical top-10
//!   frequencies, and daily incident counts, each rendered to a PNG.
//! - **Risk model**: a logistic-regression classifier over whatever
//!   score and category columns exist, degrading to a typed disabled
//!   result instead of failing when the inputs cannot support a fit.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ehs_analytics::{AssetGenerator, GeneratorConfig};
//!
//! let config = GeneratorConfig::builder()
//!     .observations_path("data/observations.csv")
//!     .incidents_path("data/incidents.csv")
//!     .output_dir("public/dashboard-assets")
//!     .build();
//!
//! let summary = AssetGenerator::new(config).run()?;
//! println!("model enabled: {}", summary.model.enabled);
//! ```
//!
//! Missing input files are soft failures (the summary carries a zero-row
//! note); malformed CSVs abort the run.

pub mod analytics;
pub mod charts;
pub mod config;
pub mod dates;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod risk;
pub mod schema;
pub mod summary;

// Re-exports for convenient access
pub use analytics::{OpenClosedTally, TOP_CATEGORIES};
pub use charts::ChartTheme;
pub use config::{GeneratorConfig, GeneratorConfigBuilder};
pub use error::{AnalyticsError, Result};
pub use pipeline::{ASSET_URL_PREFIX, AssetGenerator};
pub use risk::{ModelMetrics, TrainingOutcome};
pub use schema::ColumnResolver;
pub use summary::{
    AssetPaths, DashboardSummary, IncidentsSection, ObservationsSection, SourcePaths,
};
