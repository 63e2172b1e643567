use super::composition::Composition;
use super::ion::IonFormula;

/// Default concentration (mol/kg) assigned to dissolved species.
pub const DEFAULT_ION_CONCENTRATION: f64 = 1e-6;

/// A computed solid: the candidate compound or a competing solid phase.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidEntry {
    pub composition: Composition,
    /// Total energy per formula unit as given, before `correction`.
    pub energy: f64,
    pub correction: f64,
    pub entry_id: Option<String>,
    pub name: String,
}

impl SolidEntry {
    pub fn new(composition: Composition, energy: f64) -> Self {
        let name = composition.reduced_formula();
        Self {
            composition,
            energy,
            correction: 0.0,
            entry_id: None,
            name,
        }
    }

    pub fn with_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn corrected_energy(&self) -> f64 {
        self.energy + self.correction
    }
}

/// A dissolved species with a tabulated formation energy.
#[derive(Debug, Clone, PartialEq)]
pub struct IonEntry {
    pub ion: IonFormula,
    pub energy: f64,
    pub correction: f64,
    pub concentration: f64,
    pub entry_id: Option<String>,
}

impl IonEntry {
    pub fn new(ion: IonFormula, energy: f64) -> Self {
        Self {
            ion,
            energy,
            correction: 0.0,
            concentration: DEFAULT_ION_CONCENTRATION,
            entry_id: None,
        }
    }

    pub fn with_id(mut self, entry_id: impl Into<String>) -> Self {
        self.entry_id = Some(entry_id.into());
        self
    }

    pub fn corrected_energy(&self) -> f64 {
        self.energy + self.correction
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Solid(SolidEntry),
    Ion(IonEntry),
}

impl Entry {
    pub fn composition(&self) -> &Composition {
        match self {
            Entry::Solid(s) => &s.composition,
            Entry::Ion(i) => i.ion.composition(),
        }
    }

    pub fn corrected_energy(&self) -> f64 {
        match self {
            Entry::Solid(s) => s.corrected_energy(),
            Entry::Ion(i) => i.corrected_energy(),
        }
    }

    pub fn charge(&self) -> i32 {
        match self {
            Entry::Solid(_) => 0,
            Entry::Ion(i) => i.ion.charge(),
        }
    }

    /// Solids are pure phases with unit activity.
    pub fn concentration(&self) -> f64 {
        match self {
            Entry::Solid(_) => 1.0,
            Entry::Ion(i) => i.concentration,
        }
    }

    pub fn entry_id(&self) -> Option<&str> {
        match self {
            Entry::Solid(s) => s.entry_id.as_deref(),
            Entry::Ion(i) => i.entry_id.as_deref(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entry::Solid(s) => &s.name,
            Entry::Ion(i) => i.ion.name(),
        }
    }

    pub fn is_ion(&self) -> bool {
        matches!(self, Entry::Ion(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_entry_is_named_by_reduced_formula() {
        let entry = SolidEntry::new("Mo2S4".parse().unwrap(), -10.0);
        assert_eq!(entry.name, "MoS2");
        assert_eq!(entry.correction, 0.0);
    }

    #[test]
    fn corrected_energy_adds_correction() {
        let mut entry = IonEntry::new("MoO4[-2]".parse().unwrap(), -8.6);
        entry.correction = -0.5;
        assert!((entry.corrected_energy() + 9.1).abs() < 1e-12);
        assert_eq!(entry.concentration, DEFAULT_ION_CONCENTRATION);
    }

    #[test]
    fn entry_accessors_dispatch_on_kind() {
        let solid = Entry::Solid(SolidEntry::new("MoS2".parse().unwrap(), -20.0).with_id("cmpd"));
        let ion = Entry::Ion(IonEntry::new("MoO4[-2]".parse().unwrap(), -8.6));

        assert_eq!(solid.charge(), 0);
        assert_eq!(solid.concentration(), 1.0);
        assert_eq!(solid.entry_id(), Some("cmpd"));
        assert!(!solid.is_ion());

        assert_eq!(ion.charge(), -2);
        assert_eq!(ion.name(), "MoO4[-2]");
        assert_eq!(ion.composition().amount("O"), 4.0);
        assert!(ion.is_ion());
    }
}
