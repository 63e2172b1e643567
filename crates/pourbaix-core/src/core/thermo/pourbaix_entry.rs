use super::constants::{MU_H2O, PREFAC};
use super::plane::FreeEnergyPlane;
use crate::core::models::composition::Composition;
use crate::core::models::entry::Entry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Solid,
    Ion,
}

/// A thermodynamic entry expressed in Pourbaix (pH, potential) space.
#[derive(Debug, Clone, PartialEq)]
pub struct PourbaixEntry {
    pub name: String,
    pub entry_id: Option<String>,
    pub kind: EntryKind,
    pub composition: Composition,
    /// Reference free energy at pH = 0 and φ = 0.
    pub g0: f64,
    pub n_h: f64,
    pub n_o: f64,
    pub charge: f64,
    pub concentration: f64,
}

impl PourbaixEntry {
    pub fn from_entry(entry: &Entry) -> Self {
        let composition = entry.composition().clone();
        Self {
            name: entry.name().to_string(),
            entry_id: entry.entry_id().map(str::to_string),
            kind: if entry.is_ion() {
                EntryKind::Ion
            } else {
                EntryKind::Solid
            },
            n_h: composition.amount("H"),
            n_o: composition.amount("O"),
            composition,
            g0: entry.corrected_energy(),
            charge: entry.charge() as f64,
            concentration: entry.concentration(),
        }
    }

    /// Replaces the reference free energy, typically with a formation energy.
    pub fn with_g0(mut self, g0: f64) -> Self {
        self.g0 = g0;
        self
    }

    pub fn with_concentration(mut self, concentration: f64) -> Self {
        self.concentration = concentration;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    /// Normalizes the entry to its reduced formula unit.
    pub fn reduced(&self) -> Self {
        let (composition, factor) = self.composition.reduced_composition_and_factor();
        Self {
            composition,
            g0: self.g0 / factor,
            n_h: self.n_h / factor,
            n_o: self.n_o / factor,
            charge: self.charge / factor,
            ..self.clone()
        }
    }

    pub fn is_ion(&self) -> bool {
        self.kind == EntryKind::Ion
    }

    pub fn reduced_formula(&self) -> String {
        self.composition.reduced_formula()
    }

    pub fn num_atoms(&self) -> f64 {
        self.composition.num_atoms()
    }

    pub fn energy_per_atom(&self) -> f64 {
        let atoms = self.num_atoms();
        if atoms > 0.0 { self.g0 / atoms } else { self.g0 }
    }

    pub fn ph_coeff(&self) -> f64 {
        self.n_h - 2.0 * self.n_o
    }

    pub fn potential_coeff(&self) -> f64 {
        -self.n_h + 2.0 * self.n_o + self.charge
    }

    /// `g0 + PREFAC·log10(c) − nO·μ(H2O)`: the plane's value at pH 0, φ 0.
    pub fn conc_adjusted_g0(&self) -> f64 {
        self.g0 + PREFAC * self.concentration.log10() - self.n_o * MU_H2O
    }

    pub fn plane(&self) -> FreeEnergyPlane {
        FreeEnergyPlane::new(
            self.ph_coeff(),
            self.potential_coeff(),
            self.conc_adjusted_g0(),
        )
    }

    pub fn free_energy(&self, ph: f64, potential: f64) -> f64 {
        self.plane().evaluate(ph, potential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entry::{IonEntry, SolidEntry};

    fn molybdate() -> PourbaixEntry {
        PourbaixEntry::from_entry(&Entry::Ion(IonEntry::new(
            "MoO4[-2]".parse().unwrap(),
            -8.0,
        )))
    }

    #[test]
    fn from_entry_counts_hydrogen_oxygen_and_charge() {
        let entry = molybdate();
        assert_eq!(entry.n_h, 0.0);
        assert_eq!(entry.n_o, 4.0);
        assert_eq!(entry.charge, -2.0);
        assert_eq!(entry.kind, EntryKind::Ion);
        assert_eq!(entry.concentration, 1e-6);
        assert_eq!(entry.name, "MoO4[-2]");
    }

    #[test]
    fn free_energy_follows_the_pourbaix_expression() {
        let entry = molybdate();
        let ph = 7.0;
        let phi = 0.5;
        let expected = -8.0 + 0.0591 * (1e-6f64).log10() - 4.0 * MU_H2O
            + (0.0 - 8.0) * ph
            + phi * (0.0 + 8.0 - 2.0);
        assert!((entry.free_energy(ph, phi) - expected).abs() < 1e-12);
    }

    #[test]
    fn solid_with_unit_concentration_has_no_concentration_term() {
        let solid = PourbaixEntry::from_entry(&Entry::Solid(SolidEntry::new(
            "MoS2".parse().unwrap(),
            -3.0,
        )));
        let plane = solid.plane();
        assert_eq!(plane.constant, -3.0);
        assert_eq!(plane.ph_coeff, 0.0);
        assert_eq!(plane.potential_coeff, 0.0);
    }

    #[test]
    fn reduced_divides_all_extensive_quantities() {
        let solid = PourbaixEntry::from_entry(&Entry::Solid(SolidEntry::new(
            "Mo2S4H2O2".parse().unwrap(),
            -12.0,
        )));
        let reduced = solid.reduced();
        assert_eq!(reduced.g0, -6.0);
        assert_eq!(reduced.n_h, 1.0);
        assert_eq!(reduced.n_o, 1.0);
        assert_eq!(reduced.composition.amount("Mo"), 1.0);
        assert_eq!(reduced.energy_per_atom(), solid.energy_per_atom());
    }

    #[test]
    fn with_g0_replaces_reference_energy() {
        let entry = molybdate().with_g0(-1.5).with_name("molybdate");
        assert_eq!(entry.g0, -1.5);
        assert_eq!(entry.name, "molybdate");
    }
}
