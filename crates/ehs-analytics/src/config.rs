//! Configuration for the asset generation run.
//!
//! Defaults mirror the dashboard layout the web app expects: inputs under
//! `data/`, generated assets under the app's public directory.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_OBSERVATIONS_PATH: &str = "data/observations.csv";
pub const DEFAULT_INCIDENTS_PATH: &str = "data/incidents.csv";
pub const DEFAULT_OUTPUT_DIR: &str = "public/dashboard-assets";

/// Configuration for one generator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Path to the observations CSV.
    pub observations_path: PathBuf,
    /// Path to the incidents CSV.
    pub incidents_path: PathBuf,
    /// Directory the summary and chart images are written to.
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            observations_path: PathBuf::from(DEFAULT_OBSERVATIONS_PATH),
            incidents_path: PathBuf::from(DEFAULT_INCIDENTS_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }
}

/// Fluent builder for [`GeneratorConfig`].
#[derive(Debug, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    pub fn observations_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.observations_path = path.into();
        self
    }

    pub fn incidents_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.incidents_path = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}
