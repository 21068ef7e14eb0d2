use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvacError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Model load error: {0}")]
    ModelLoad(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Usage error: {0}")]
    Usage(String),

    #[error("Malformed trace: {0}")]
    Trace(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<config::ConfigError> for EvacError {
    fn from(e: config::ConfigError) -> Self {
        EvacError::Configuration(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EvacError>;
