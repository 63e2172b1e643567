use crate::core::models::element;
use crate::core::models::ion::{IonFormula, IonFormulaError};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ION_ENERGIES_FILE: &str = "ion_energies.csv";
pub const ION_CORRECTIONS_FILE: &str = "ion_corrections.toml";
pub const END_MEMBERS_FILE: &str = "end_members.toml";
pub const ION_COLORS_FILE: &str = "ion_colors.toml";

#[derive(Debug, Error)]
pub enum ReferenceLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid ion formula '{formula}' in '{path}': {source}")]
    InvalidIon {
        path: String,
        formula: String,
        source: IonFormulaError,
    },
    #[error("Unknown element '{symbol}' in '{path}'")]
    UnknownElement { path: String, symbol: String },
    #[error("Color value {value} for '{formula}' is outside [0, 1]")]
    ColorOutOfRange { formula: String, value: f64 },
}

/// Locations of the four reference tables.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePaths {
    pub ion_energies: PathBuf,
    pub ion_corrections: PathBuf,
    pub end_members: PathBuf,
    pub ion_colors: PathBuf,
}

impl ReferencePaths {
    /// Standard file names inside a single data directory.
    pub fn in_directory(dir: &Path) -> Self {
        Self {
            ion_energies: dir.join(ION_ENERGIES_FILE),
            ion_corrections: dir.join(ION_CORRECTIONS_FILE),
            end_members: dir.join(END_MEMBERS_FILE),
            ion_colors: dir.join(ION_COLORS_FILE),
        }
    }
}

/// An experimental ion formation energy as tabulated.
#[derive(Debug, Clone, PartialEq)]
pub struct TabulatedIon {
    pub formula: IonFormula,
    pub energy: f64,
}

#[derive(Debug, Deserialize)]
struct IonEnergyRecord {
    element: String,
    ion: String,
    energy: f64,
}

/// Read-only thermodynamic reference data, loaded once and shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    /// Element → ions recorded for it, in file order.
    pub ion_energies: BTreeMap<String, Vec<TabulatedIon>>,
    /// Element → DFT correction applied per atom of that element in an ion.
    pub ion_corrections: HashMap<String, f64>,
    /// Element → reference energy per atom.
    pub end_member_energies: HashMap<String, f64>,
    /// Species formula → colormap position in [0, 1].
    pub ion_colors: HashMap<String, f64>,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(paths: &ReferencePaths) -> Result<Self, ReferenceLoadError> {
        let ion_energies = Self::load_ion_energies(&paths.ion_energies)?;
        let ion_corrections = Self::load_element_table(&paths.ion_corrections)?;
        let end_member_energies = Self::load_element_table(&paths.end_members)?;
        let ion_colors = Self::load_colors(&paths.ion_colors)?;

        Ok(Self {
            ion_energies,
            ion_corrections,
            end_member_energies,
            ion_colors,
        })
    }

    pub fn ions_for(&self, element: &str) -> &[TabulatedIon] {
        self.ion_energies
            .get(element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn correction(&self, element: &str) -> Option<f64> {
        self.ion_corrections.get(element).copied()
    }

    pub fn end_member(&self, element: &str) -> Option<f64> {
        self.end_member_energies.get(element).copied()
    }

    pub fn color(&self, formula: &str) -> Option<f64> {
        self.ion_colors.get(formula).copied()
    }

    pub fn with_ion(
        mut self,
        element: &str,
        formula: &str,
        energy: f64,
    ) -> Result<Self, IonFormulaError> {
        let formula: IonFormula = formula.parse()?;
        self.ion_energies
            .entry(element.to_string())
            .or_default()
            .push(TabulatedIon { formula, energy });
        Ok(self)
    }

    pub fn with_correction(mut self, element: &str, value: f64) -> Self {
        self.ion_corrections.insert(element.to_string(), value);
        self
    }

    pub fn with_end_member(mut self, element: &str, value: f64) -> Self {
        self.end_member_energies.insert(element.to_string(), value);
        self
    }

    pub fn with_color(mut self, formula: &str, value: f64) -> Self {
        self.ion_colors.insert(formula.to_string(), value);
        self
    }

    fn load_ion_energies(
        path: &Path,
    ) -> Result<BTreeMap<String, Vec<TabulatedIon>>, ReferenceLoadError> {
        let file = std::fs::File::open(path).map_err(|e| ReferenceLoadError::Io {
            path: path_string(path),
            source: e,
        })?;
        parse_ion_energies(file, &path_string(path))
    }

    fn load_element_table(path: &Path) -> Result<HashMap<String, f64>, ReferenceLoadError> {
        let table = read_float_table(path)?;
        if let Some(symbol) = table.keys().find(|s| !element::is_element(s)) {
            return Err(ReferenceLoadError::UnknownElement {
                path: path_string(path),
                symbol: symbol.clone(),
            });
        }
        Ok(table)
    }

    fn load_colors(path: &Path) -> Result<HashMap<String, f64>, ReferenceLoadError> {
        let table = read_float_table(path)?;
        if let Some((formula, &value)) = table.iter().find(|(_, v)| !(0.0..=1.0).contains(*v)) {
            return Err(ReferenceLoadError::ColorOutOfRange {
                formula: formula.clone(),
                value,
            });
        }
        Ok(table)
    }
}

/// Parses `element,ion,energy` records.
pub fn parse_ion_energies<R: Read>(
    reader: R,
    source_name: &str,
) -> Result<BTreeMap<String, Vec<TabulatedIon>>, ReferenceLoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut ions: BTreeMap<String, Vec<TabulatedIon>> = BTreeMap::new();

    for result in reader.deserialize::<IonEnergyRecord>() {
        let record = result.map_err(|e| ReferenceLoadError::Csv {
            path: source_name.to_string(),
            source: e,
        })?;
        if !element::is_element(&record.element) {
            return Err(ReferenceLoadError::UnknownElement {
                path: source_name.to_string(),
                symbol: record.element,
            });
        }
        let formula: IonFormula =
            record
                .ion
                .parse()
                .map_err(|e| ReferenceLoadError::InvalidIon {
                    path: source_name.to_string(),
                    formula: record.ion.clone(),
                    source: e,
                })?;
        ions.entry(record.element).or_default().push(TabulatedIon {
            formula,
            energy: record.energy,
        });
    }
    Ok(ions)
}

fn read_float_table(path: &Path) -> Result<HashMap<String, f64>, ReferenceLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ReferenceLoadError::Io {
        path: path_string(path),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ReferenceLoadError::Toml {
        path: path_string(path),
        source: e,
    })
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write_valid_tables(dir: &Path) -> ReferencePaths {
        let paths = ReferencePaths::in_directory(dir);
        fs::write(
            &paths.ion_energies,
            "element,ion,energy\nMo,MoO4[-2],-8.6677\nMo,Mo[+3],-0.598\nS,SO4[-2],-7.7165\n",
        )
        .unwrap();
        fs::write(&paths.ion_corrections, "Mo = -0.387\nS = 0.198\n").unwrap();
        fs::write(&paths.end_members, "Mo = -10.846\nS = -4.1369\nO = -4.948\n").unwrap();
        fs::write(&paths.ion_colors, "\"MoO4[-2]\" = 0.2\n\"Mo[+3]\" = 0.9\n").unwrap();
        paths
    }

    #[test]
    fn load_succeeds_with_valid_tables() {
        let dir = tempdir().unwrap();
        let paths = write_valid_tables(dir.path());

        let data = ReferenceData::load(&paths).unwrap();

        let mo_ions = data.ions_for("Mo");
        assert_eq!(mo_ions.len(), 2);
        assert_eq!(mo_ions[0].formula.name(), "MoO4[-2]");
        assert_eq!(mo_ions[0].formula.charge(), -2);
        assert_eq!(mo_ions[1].energy, -0.598);
        assert_eq!(data.correction("S"), Some(0.198));
        assert_eq!(data.end_member("O"), Some(-4.948));
        assert_eq!(data.color("Mo[+3]"), Some(0.9));
        assert!(data.ions_for("W").is_empty());
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let paths = ReferencePaths::in_directory(dir.path());
        let result = ReferenceData::load(&paths);
        assert!(matches!(result, Err(ReferenceLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let paths = write_valid_tables(dir.path());
        fs::write(&paths.end_members, "this is not toml").unwrap();
        let result = ReferenceData::load(&paths);
        assert!(matches!(result, Err(ReferenceLoadError::Toml { .. })));
    }

    #[test]
    fn load_fails_for_malformed_csv() {
        let dir = tempdir().unwrap();
        let paths = write_valid_tables(dir.path());
        fs::write(&paths.ion_energies, "element,ion,energy\nMo,MoO4[-2],abc\n").unwrap();
        let result = ReferenceData::load(&paths);
        assert!(matches!(result, Err(ReferenceLoadError::Csv { .. })));
    }

    #[test]
    fn load_rejects_unknown_elements_and_bad_ions() {
        let dir = tempdir().unwrap();
        let paths = write_valid_tables(dir.path());
        fs::write(&paths.ion_corrections, "Xx = 1.0\n").unwrap();
        assert!(matches!(
            ReferenceData::load(&paths),
            Err(ReferenceLoadError::UnknownElement { .. })
        ));

        let paths = write_valid_tables(dir.path());
        fs::write(&paths.ion_energies, "element,ion,energy\nMo,Mo[+q],1.0\n").unwrap();
        assert!(matches!(
            ReferenceData::load(&paths),
            Err(ReferenceLoadError::InvalidIon { .. })
        ));
    }

    #[test]
    fn load_rejects_colors_outside_unit_interval() {
        let dir = tempdir().unwrap();
        let paths = write_valid_tables(dir.path());
        fs::write(&paths.ion_colors, "\"MoO4[-2]\" = 1.5\n").unwrap();
        assert!(matches!(
            ReferenceData::load(&paths),
            Err(ReferenceLoadError::ColorOutOfRange { .. })
        ));
    }

    #[test]
    fn builder_methods_assemble_reference_data() {
        let data = ReferenceData::new()
            .with_ion("Mo", "MoO4[-2]", -8.0)
            .unwrap()
            .with_correction("Mo", -0.4)
            .with_end_member("Mo", -10.8)
            .with_color("MoO4[-2]", 0.3);
        assert_eq!(data.ions_for("Mo").len(), 1);
        assert_eq!(data.correction("Mo"), Some(-0.4));
        assert_eq!(data.end_member("Mo"), Some(-10.8));
        assert_eq!(data.color("MoO4[-2]"), Some(0.3));
    }
}
