use std::path::Path;

use ::config::{
    builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File, Source,
};
use serde::Deserialize;
use tracing::debug;

use crate::counter::IncrementOrdering;
use crate::error::DemoError;

pub const DEFAULT_WORKERS: usize = 2;
pub const DEFAULT_INCREMENTS: usize = 1_000_000;

const ENV_PREFIX: &str = "COUNTERS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DemoConfig {
    pub workers: usize,
    pub increments: usize,
    #[serde(default)]
    pub ordering: IncrementOrdering,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            increments: DEFAULT_INCREMENTS,
            ordering: IncrementOrdering::SeqCst,
        }
    }
}

impl DemoConfig {
    /// Defaults, then an optional `counters.toml` in the working directory,
    /// then `COUNTERS_*` environment variables.
    pub fn load() -> Result<Self, DemoError> {
        Self::load_with(
            File::with_name("counters").required(false),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, DemoError> {
        Self::load_with(
            File::from(path.as_ref()),
            Environment::with_prefix(ENV_PREFIX),
        )
    }

    /// The environment is layered last so it beats the file.
    fn load_with<S>(file: S, env: Environment) -> Result<Self, DemoError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = defaults()?.add_source(file).add_source(env).build()?;
        Self::from_config(config)
    }

    fn from_config(config: Config) -> Result<Self, DemoError> {
        let demo: DemoConfig = config.try_deserialize()?;
        debug!(?demo, "loaded config");
        demo.validate()?;
        Ok(demo)
    }

    pub fn validate(&self) -> Result<(), DemoError> {
        if self.workers == 0 {
            return Err(DemoError::InvalidConfig(
                "at least one worker is required".to_string(),
            ));
        }
        self.expected_total()?;
        Ok(())
    }

    /// `workers * increments`, the value a lossless counter ends on.
    pub fn expected_total(&self) -> Result<u64, DemoError> {
        (self.workers as u64)
            .checked_mul(self.increments as u64)
            .ok_or_else(|| {
                DemoError::InvalidConfig(format!(
                    "{} workers x {} increments overflows a u64",
                    self.workers, self.increments
                ))
            })
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("workers", DEFAULT_WORKERS as i64)?
        .set_default("increments", DEFAULT_INCREMENTS as i64)?
        .set_default("ordering", "seq_cst")
}
