//! # Core Module
//!
//! Stateless building blocks for Pourbaix stability analysis.
//!
//! - **Chemical Representation** ([`models`]) - Elements, compositions, ion formulas and entries
//! - **Thermodynamics** ([`thermo`]) - Free-energy planes, Pourbaix entries and the diagram type
//! - **Reference Data** ([`reference`]) - Ion energies, corrections, end members and plot colors
//! - **Geometry** ([`utils`]) - Convex polygon clipping over the (pH, φ) plane
//! - **File I/O** ([`io`]) - PDF plots and TOML summaries of finished diagrams

pub mod io;
pub mod models;
pub mod reference;
pub mod thermo;
pub mod utils;
