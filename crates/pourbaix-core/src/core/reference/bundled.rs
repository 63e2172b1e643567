//! The default reference tables shipped with the library.

use super::data::{ReferenceData, ReferenceLoadError, parse_ion_energies};
use std::collections::HashMap;

pub const ION_ENERGIES_CSV: &str = include_str!("../../../data/ion_energies.csv");
pub const ION_CORRECTIONS_TOML: &str = include_str!("../../../data/ion_corrections.toml");
pub const END_MEMBERS_TOML: &str = include_str!("../../../data/end_members.toml");
pub const ION_COLORS_TOML: &str = include_str!("../../../data/ion_colors.toml");

/// `(file name, contents)` pairs, for writing the defaults to disk.
pub const FILES: [(&str, &str); 4] = [
    (super::data::ION_ENERGIES_FILE, ION_ENERGIES_CSV),
    (super::data::ION_CORRECTIONS_FILE, ION_CORRECTIONS_TOML),
    (super::data::END_MEMBERS_FILE, END_MEMBERS_TOML),
    (super::data::ION_COLORS_FILE, ION_COLORS_TOML),
];

impl ReferenceData {
    pub fn bundled() -> Result<Self, ReferenceLoadError> {
        let parse_table = |name: &str, content: &str| {
            toml::from_str::<HashMap<String, f64>>(content).map_err(|e| ReferenceLoadError::Toml {
                path: name.to_string(),
                source: e,
            })
        };

        Ok(Self {
            ion_energies: parse_ion_energies(ION_ENERGIES_CSV.as_bytes(), "<bundled ion energies>")?,
            ion_corrections: parse_table("<bundled ion corrections>", ION_CORRECTIONS_TOML)?,
            end_member_energies: parse_table("<bundled end members>", END_MEMBERS_TOML)?,
            ion_colors: parse_table("<bundled ion colors>", ION_COLORS_TOML)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_parse() {
        let data = ReferenceData::bundled().unwrap();
        assert!(!data.ions_for("Mo").is_empty());
        assert!(!data.ions_for("S").is_empty());
        assert!(data.end_member("Mo").is_some());
        assert!(data.end_member("O").is_some());
        assert!(data.end_member("H").is_some());
    }

    #[test]
    fn every_bundled_ion_element_has_a_correction_and_end_member() {
        let data = ReferenceData::bundled().unwrap();
        for element in data.ion_energies.keys() {
            assert!(data.correction(element).is_some(), "no correction for {element}");
            assert!(data.end_member(element).is_some(), "no end member for {element}");
        }
    }

    #[test]
    fn every_bundled_ion_has_a_color_in_range() {
        let data = ReferenceData::bundled().unwrap();
        for ions in data.ion_energies.values() {
            for ion in ions {
                let color = data.color(ion.formula.name()).unwrap();
                assert!((0.0..=1.0).contains(&color));
            }
        }
    }
}
