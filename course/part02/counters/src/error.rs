use config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum DemoError {
    #[error("failed to load config: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("worker {worker} panicked before finishing its increments")]
    WorkerPanicked { worker: usize },
}
