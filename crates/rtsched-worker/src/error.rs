use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Scheduler loop panicked: {0}")]
    LoopPanicked(String),
}

pub type Result<T> = std::result::Result<T, WorkerError>;
