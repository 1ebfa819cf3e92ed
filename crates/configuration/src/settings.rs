use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for the entire application.
///
/// Every section has defaults, so an empty (or missing) file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputPaths,
    pub output: OutputPaths,
    pub analysis: AnalysisParams,
    pub charts: ChartParams,
}

impl Config {
    /// Names of the sections whose values differ from the built-in defaults.
    pub fn changed_sections(&self) -> Vec<&'static str> {
        let defaults = Config::default();
        let mut changed = Vec::new();
        if self.input != defaults.input {
            changed.push("input");
        }
        if self.output != defaults.output {
            changed.push("output");
        }
        if self.analysis != defaults.analysis {
            changed.push("analysis");
        }
        if self.charts != defaults.charts {
            changed.push("charts");
        }
        changed
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let analysis = &self.analysis;
        if analysis.histogram_bins == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.histogram_bins must be at least 1".to_string(),
            ));
        }
        if analysis.top_countries == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.top_countries must be at least 1".to_string(),
            ));
        }
        if analysis.density_grid < 2 {
            return Err(ConfigError::ValidationError(
                "analysis.density_grid must be at least 2".to_string(),
            ));
        }

        let charts = &self.charts;
        if [charts.width, charts.height, charts.heatmap_width, charts.heatmap_height].contains(&0) {
            return Err(ConfigError::ValidationError(
                "chart dimensions must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Locations of the two input tables.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputPaths {
    /// Parquet file with one row per transaction.
    pub transactions: String,
    /// Parquet file with a `date` column and one rate column per currency.
    pub exchange_rates: String,
}

impl Default for InputPaths {
    fn default() -> Self {
        Self {
            transactions: "transaction_fraud_data.parquet".to_string(),
            exchange_rates: "historical_currency_exchange.parquet".to_string(),
        }
    }
}

/// Where the charts and the text report are written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputPaths {
    pub plots_dir: String,
    pub report: String,
}

impl Default for OutputPaths {
    fn default() -> Self {
        Self {
            plots_dir: "plots".to_string(),
            report: "report.txt".to_string(),
        }
    }
}

/// Parameters of the aggregate computations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Number of equal-width bins in the amount histogram.
    pub histogram_bins: usize,
    /// How many countries the ranking keeps.
    pub top_countries: usize,
    /// Number of points the density curve is evaluated at.
    pub density_grid: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            top_countries: 10,
            density_grid: 200,
        }
    }
}

/// Pixel sizes of the rendered charts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ChartParams {
    pub width: u32,
    pub height: u32,
    pub heatmap_width: u32,
    pub heatmap_height: u32,
}

impl Default for ChartParams {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            heatmap_width: 1000,
            heatmap_height: 800,
        }
    }
}
