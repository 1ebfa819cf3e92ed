use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

#[cfg(feature = "clap")]
pub mod cli;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalysisParams, ChartParams, Config, InputPaths, OutputPaths};

/// Prefix for environment overrides, e.g. `EDA__ANALYSIS__TOP_COUNTRIES=5`.
pub const ENV_PREFIX: &str = "EDA";

/// Loads the application configuration.
///
/// Sources are layered: built-in defaults, then the TOML file at `path` (if it
/// exists), then `EDA__*` environment variables. With neither a file nor
/// overrides the result equals `Config::default()`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        tracing::info!(path = %path.display(), "Reading configuration file.");
    } else {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults.");
    }

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    let changed = config.changed_sections();
    if !changed.is_empty() {
        tracing::info!(sections = ?changed, "Configuration overrides defaults.");
    }
    Ok(config)
}
