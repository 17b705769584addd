// Module exports for CLI subcommands
//
// Each module handles one subcommand. main.rs parses arguments and dispatches
// to these handlers with the shared `GlobalOptions`.

pub mod borders;
pub mod resolve;
pub mod route;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use landroute_lib::{load_dataset, CountryDataset, EngineConfig, RoutingEngine};

use landroute_cli::output::OutputFormat;

/// Options shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub data: Option<PathBuf>,
    pub cache_file: Option<PathBuf>,
    pub no_cache_file: bool,
    pub format: OutputFormat,
}

impl GlobalOptions {
    /// Load the country dataset from `--data`, `LANDROUTE_DATA` or the
    /// platform data directory.
    pub fn load_dataset(&self) -> Result<Arc<CountryDataset>> {
        let dataset =
            load_dataset(self.data.as_deref()).context("failed to load the country dataset")?;
        Ok(Arc::new(dataset))
    }

    /// Engine settings from the environment, overridden by the cache flags.
    ///
    /// `persistent == false` always keeps the cache in memory.
    pub fn engine_config(&self, persistent: bool) -> EngineConfig {
        let config = EngineConfig::from_env();
        if !persistent || self.no_cache_file {
            return config.with_cache_path(None);
        }
        match &self.cache_file {
            Some(path) => config.with_cache_path(Some(path.clone())),
            None => config,
        }
    }

    /// Build an engine over `dataset`.
    pub fn open_engine(
        &self,
        dataset: &Arc<CountryDataset>,
        persistent: bool,
    ) -> Result<RoutingEngine<Arc<CountryDataset>>> {
        let config = self.engine_config(persistent);
        RoutingEngine::open(Arc::clone(dataset), dataset.as_ref(), &config)
            .context("failed to start the routing engine")
    }
}
