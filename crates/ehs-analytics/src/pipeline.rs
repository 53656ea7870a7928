//! Sequential asset-generation pipeline.
//!
//! load → analyze → chart → train → persist, strictly in that order. The
//! only state crossing stage boundaries is the summary document under
//! assembly and the output directory, created once before any writes.

use crate::analytics::{self, TOP_CATEGORIES};
use crate::charts::{self, ChartTheme};
use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::loader;
use crate::risk::{self, ModelMetrics};
use crate::schema::{self, ColumnResolver};
use crate::summary::{
    self, AssetPaths, DashboardSummary, IncidentsSection, ObservationsSection, SourcePaths,
};
use std::fs;
use tracing::info;

/// Public mount point of the output directory in the web app.
pub const ASSET_URL_PREFIX: &str = "/dashboard-assets";

pub const OBSERVATIONS_BY_TYPE_PNG: &str = "observations_by_type.png";
pub const OBSERVATIONS_BY_SITE_PNG: &str = "observations_by_site.png";
pub const INCIDENTS_OVER_TIME_PNG: &str = "incidents_over_time.png";

/// Runs the full generation pipeline for one configuration.
pub struct AssetGenerator {
    config: GeneratorConfig,
    theme: ChartTheme,
}

impl AssetGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            theme: ChartTheme::default(),
        }
    }

    /// Execute the run and return the summary that was written.
    pub fn run(&self) -> Result<DashboardSummary> {
        fs::create_dir_all(&self.config.output_dir)?;

        let mut assets = AssetPaths::default();
        let observations = self.observations_stage(&mut assets)?;
        let (incidents, model) = self.incidents_stage(&mut assets)?;

        let document = DashboardSummary {
            generated_at: summary::generation_timestamp(),
            sources: SourcePaths {
                observations: self.config.observations_path.display().to_string(),
                incidents: self.config.incidents_path.display().to_string(),
            },
            observations,
            incidents,
            model,
            assets,
        };

        let path = summary::write_summary(&document, &self.config.output_dir)?;
        info!("Summary written to {}", path.display());
        Ok(document)
    }

    fn observations_stage(&self, assets: &mut AssetPaths) -> Result<ObservationsSection> {
        let Some(df) = loader::load_table(&self.config.observations_path)? else {
            return Ok(ObservationsSection::missing());
        };
        info!("Loaded {} observation rows", df.height());

        let tally = analytics::open_closed_tally(&df)?;
        let resolver = ColumnResolver::new(&df);

        if let Some(column) = resolver.resolve(schema::OBSERVATION_TYPE) {
            let counts = analytics::value_frequencies(&df, column, TOP_CATEGORIES)?;
            let out = self.config.output_dir.join(OBSERVATIONS_BY_TYPE_PNG);
            if charts::render_bar_chart(&self.theme, &counts, "Observations by type", &out)? {
                assets.observations_by_type = Some(asset_url(OBSERVATIONS_BY_TYPE_PNG));
            }
        }

        if let Some(column) = resolver.resolve(schema::OBSERVATION_SITE) {
            let counts = analytics::value_frequencies(&df, column, TOP_CATEGORIES)?;
            let out = self.config.output_dir.join(OBSERVATIONS_BY_SITE_PNG);
            if charts::render_bar_chart(&self.theme, &counts, "Observations by site", &out)? {
                assets.observations_by_site = Some(asset_url(OBSERVATIONS_BY_SITE_PNG));
            }
        }

        Ok(ObservationsSection::present(df.height(), tally))
    }

    fn incidents_stage(&self, assets: &mut AssetPaths) -> Result<(IncidentsSection, ModelMetrics)> {
        let Some(df) = loader::load_table(&self.config.incidents_path)? else {
            return Ok((IncidentsSection::missing(), ModelMetrics::disabled(0)));
        };
        info!("Loaded {} incident rows", df.height());

        let resolver = ColumnResolver::new(&df);
        if let Some(column) = resolver.resolve(schema::INCIDENT_DATE) {
            let series = analytics::daily_counts(&df, column)?;
            let out = self.config.output_dir.join(INCIDENTS_OVER_TIME_PNG);
            if charts::render_line_chart(&self.theme, &series, "Incidents over time", &out)? {
                assets.incidents_over_time = Some(asset_url(INCIDENTS_OVER_TIME_PNG));
            }
        }

        let model = risk::train_risk_model(&df)?;
        Ok((IncidentsSection::present(df.height()), model))
    }
}

fn asset_url(file_name: &str) -> String {
    format!("{}/{}", ASSET_URL_PREFIX, file_name)
}
