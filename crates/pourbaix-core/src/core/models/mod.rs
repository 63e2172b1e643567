//! Chemical data models: elements, compositions, ion formulas and
//! thermodynamic entries.
//!
//! Everything here is immutable once constructed. Compositions are parsed from
//! formula strings (`MoS2`, `Mo(SO4)2`) and ion formulas add an integer charge
//! (`MoO4[-2]`, `H2S(aq)`).

pub mod composition;
pub mod element;
pub mod entry;
pub mod ids;
pub mod ion;
