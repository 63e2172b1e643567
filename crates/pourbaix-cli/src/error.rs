use pourbaix2d::core::reference::data::ReferenceLoadError;
use pourbaix2d::engine::error::EngineError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Reference data error: {0}")]
    Reference(#[from] ReferenceLoadError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Data directory error: {0}")]
    Data(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write screening results: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to install logger: {0}")]
    Logging(String),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
