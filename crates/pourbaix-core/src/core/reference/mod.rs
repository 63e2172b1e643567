//! Thermodynamic reference tables: experimental ion formation energies, ion
//! DFT corrections, elemental end-member energies and ion plot colors.
//!
//! Tables are loaded once into an immutable [`data::ReferenceData`] and
//! injected into the engine; nothing here is process-global.

pub mod bundled;
pub mod data;
