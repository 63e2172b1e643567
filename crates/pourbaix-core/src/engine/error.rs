use thiserror::Error;

use super::config::ConfigError;
use crate::core::io::traits::DiagramIoError;
use crate::core::models::composition::CompositionError;
use crate::core::reference::data::ReferenceLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid composition: {0}")]
    Composition(#[from] CompositionError),

    #[error("Total energy must be finite, got {0}")]
    InvalidEnergy(f64),

    #[error("Reference data could not be loaded: {0}")]
    Reference(#[from] ReferenceLoadError),

    #[error("Required reference entry missing: no {table} value for element '{element}'")]
    MissingReference {
        table: &'static str,
        element: String,
    },

    #[error("Cannot construct a diagram from an empty entry set")]
    EmptyEntrySet,

    #[error("Entry '{0}' is not part of the diagram")]
    EntryNotFound(String),

    #[error("Failed to write diagram artifact: {0}")]
    Artifact(#[from] DiagramIoError),

    #[error("Internal logic error: {0}")]
    Internal(String),
}
