use crate::core::models::ids::EntryKey;
use crate::core::thermo::diagram::PourbaixDiagram;
use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiagramIoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to serialize summary: {0}")]
    Toml(#[from] toml::ser::Error),
}

/// Everything a renderer needs to persist one diagram.
#[derive(Debug, Clone, Copy)]
pub struct DiagramArtifact<'a> {
    pub diagram: &'a PourbaixDiagram,
    /// The candidate compound, drawn distinctly from the ions.
    pub highlight: Option<EntryKey>,
    /// Colormap positions in `[0, 1]` keyed by ion name or reduced formula.
    pub colors: &'a HashMap<String, f64>,
    pub instability: Option<f64>,
}

impl<'a> DiagramArtifact<'a> {
    pub fn new(diagram: &'a PourbaixDiagram, colors: &'a HashMap<String, f64>) -> Self {
        Self {
            diagram,
            highlight: None,
            colors,
            instability: None,
        }
    }

    pub fn with_highlight(mut self, key: EntryKey) -> Self {
        self.highlight = Some(key);
        self
    }

    pub fn with_instability(mut self, instability: f64) -> Self {
        self.instability = Some(instability);
        self
    }
}

/// Defines the interface for persisting a diagram in some file format.
///
/// Implementors only provide [`DiagramFile::write_to`]; writing to a path is
/// derived from it.
pub trait DiagramFile {
    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Conventional file extension, without the dot.
    const EXTENSION: &'static str;

    /// Writes the artifact to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the writer reports an I/O error.
    fn write_to(artifact: &DiagramArtifact, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Writes the artifact to a file path, creating or truncating the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        artifact: &DiagramArtifact,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(artifact, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
