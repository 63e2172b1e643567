//! # pourbaix2d
//!
//! Electrochemical stability of two-dimensional materials in water.
//!
//! Given a compound's composition and computed total energy, the library
//! builds the compound's entry and those of its dissolved ions, constructs
//! the lower envelope of their free-energy planes over pH and electrode
//! potential, and reports how far the compound sits above that envelope.
//!
//! ## Architecture
//!
//! - **[`core`]: The Foundation.** Stateless chemistry models, free-energy
//!   planes, reference data tables, polygon geometry and diagram writers.
//!
//! - **[`engine`]: The Logic Core.** Entry construction and deduplication,
//!   exact half-plane hull construction, and energy-above-hull analysis.
//!
//! - **[`workflows`]: The Public API.** [`workflows::stability::run`] ties the
//!   layers together for one compound and optionally writes its plot.

pub mod core;
pub mod engine;
pub mod workflows;
