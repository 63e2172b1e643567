use super::config::DiagramConfig;
use super::error::EngineError;
use crate::core::models::composition::Composition;
use crate::core::models::entry::{Entry, IonEntry, SolidEntry};
use crate::core::reference::data::{ReferenceData, TabulatedIon};
use crate::core::thermo::pourbaix_entry::PourbaixEntry;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Identifier given to the candidate compound's entry.
pub const COMPOUND_ENTRY_ID: &str = "compound";

const DUPLICATE_ENERGY_TOLERANCE: f64 = 1e-6;
const SOLVENT_ELEMENTS: [&str; 2] = ["O", "H"];

/// The candidate material: a composition and its computed total energy.
#[derive(Debug, Clone, PartialEq)]
pub struct StabilityTarget {
    pub composition: Composition,
    pub energy: f64,
}

impl StabilityTarget {
    pub fn new(composition: Composition, energy: f64) -> Result<Self, EngineError> {
        if !energy.is_finite() {
            return Err(EngineError::InvalidEnergy(energy));
        }
        Ok(Self {
            composition,
            energy,
        })
    }

    pub fn parse(formula: &str, energy: f64) -> Result<Self, EngineError> {
        let composition: Composition = formula.parse()?;
        Self::new(composition, energy)
    }

    /// Elements of the compound other than O and H.
    pub fn target_elements(&self) -> Vec<&str> {
        self.composition
            .elements()
            .filter(|e| !SOLVENT_ELEMENTS.contains(e))
            .collect()
    }

    /// O and H followed by every other element of the compound.
    pub fn chemical_system(&self) -> Vec<&str> {
        SOLVENT_ELEMENTS
            .iter()
            .copied()
            .chain(self.target_elements())
            .collect()
    }
}

/// The compound entry and its ionic competitors.
#[derive(Debug, Clone)]
pub struct EntrySet {
    pub compound: PourbaixEntry,
    pub ions: Vec<PourbaixEntry>,
}

impl EntrySet {
    /// Compound first, then ions in construction order.
    pub fn into_vec(self) -> Vec<PourbaixEntry> {
        std::iter::once(self.compound).chain(self.ions).collect()
    }
}

pub fn build_entries(
    target: &StabilityTarget,
    reference: &ReferenceData,
    config: &DiagramConfig,
) -> Result<EntrySet, EngineError> {
    let compound = build_compound_entry(target, reference, config.metastability_mev_per_atom)?;
    let ions = build_ion_entries(target, reference, config.ion_concentration)?;
    debug!(
        compound = %compound.name,
        g0 = compound.g0,
        ion_count = ions.len(),
        "Entries constructed."
    );
    Ok(EntrySet { compound, ions })
}

/// The compound's entry, with `g0` set to its formation energy relative to
/// the end members and normalized to the reduced formula unit.
pub fn build_compound_entry(
    target: &StabilityTarget,
    reference: &ReferenceData,
    metastability_mev_per_atom: f64,
) -> Result<PourbaixEntry, EngineError> {
    let mut solid =
        SolidEntry::new(target.composition.clone(), target.energy).with_id(COMPOUND_ENTRY_ID);
    solid.correction -= solid.composition.num_atoms() * metastability_mev_per_atom / 1000.0;

    let mut formation_energy = solid.corrected_energy();
    for (element, amount) in target.composition.iter() {
        let reference_energy =
            reference
                .end_member(element)
                .ok_or_else(|| EngineError::MissingReference {
                    table: "end-member energy",
                    element: element.to_string(),
                })?;
        formation_energy -= reference_energy * amount;
    }

    Ok(PourbaixEntry::from_entry(&Entry::Solid(solid))
        .with_g0(formation_energy)
        .reduced())
}

/// One entry per (ion, target element) pair where the ion contains the
/// element. The entry's energy is shifted by `correction[el] * amount[el]`
/// for that element only, and its identifier is `"<ion>:<element>"` so
/// that sibling entries of the same ion survive deduplication.
pub fn build_ion_entries(
    target: &StabilityTarget,
    reference: &ReferenceData,
    concentration: f64,
) -> Result<Vec<PourbaixEntry>, EngineError> {
    let target_elements = target.target_elements();
    let chemical_system: HashSet<&str> = target.chemical_system().into_iter().collect();

    let mut seen = HashSet::new();
    let mut candidates: Vec<&TabulatedIon> = Vec::new();
    for element in &target_elements {
        let ions = reference.ions_for(element);
        if ions.is_empty() {
            warn!(element, "No ion data recorded; element contributes no ionic competitors.");
        }
        candidates.extend(ions.iter().filter(|ion| seen.insert(ion.formula.name())));
    }
    candidates.retain(|ion| {
        let foreign = ion
            .formula
            .composition()
            .elements()
            .find(|e| !chemical_system.contains(e));
        if let Some(foreign) = foreign {
            debug!(
                ion = ion.formula.name(),
                foreign, "Skipping ion outside the chemical system."
            );
        }
        foreign.is_none()
    });

    let mut entries = Vec::new();
    for element in &target_elements {
        let containing: Vec<_> = candidates
            .iter()
            .map(|ion| (*ion, ion.formula.composition().amount(element)))
            .filter(|(_, amount)| *amount != 0.0)
            .collect();
        if containing.is_empty() {
            continue;
        }
        let factor = reference
            .correction(element)
            .ok_or_else(|| EngineError::MissingReference {
                table: "ion correction",
                element: element.to_string(),
            })?;

        for (ion, amount) in containing {
            let mut ion_entry = IonEntry::new(ion.formula.clone(), ion.energy)
                .with_id(format!("{}:{}", ion.formula.name(), element));
            ion_entry.correction = factor * amount;
            ion_entry.concentration = concentration;
            entries.push(PourbaixEntry::from_entry(&Entry::Ion(ion_entry)));
        }
    }
    Ok(entries)
}

/// Two entries are duplicates when they share an identifier, or when their
/// reduced formulas match and their energies per atom agree within 1e-6.
pub fn is_duplicate(a: &PourbaixEntry, b: &PourbaixEntry) -> bool {
    if let (Some(id_a), Some(id_b)) = (&a.entry_id, &b.entry_id) {
        if id_a == id_b {
            return true;
        }
    }
    (a.energy_per_atom() - b.energy_per_atom()).abs() < DUPLICATE_ENERGY_TOLERANCE
        && a.reduced_formula() == b.reduced_formula()
}

/// Drops later duplicates; the first occurrence wins.
pub fn deduplicate(entries: Vec<PourbaixEntry>) -> Vec<PourbaixEntry> {
    let mut unique: Vec<PourbaixEntry> = Vec::with_capacity(entries.len());
    for entry in entries {
        if unique.iter().any(|kept| is_duplicate(kept, &entry)) {
            debug!(entry = %entry.name, "Dropping duplicate entry.");
            continue;
        }
        unique.push(entry);
    }
    unique
}
