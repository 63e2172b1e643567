//! Free-energy bookkeeping in Pourbaix space.
//!
//! Each entry's free energy is affine in (pH, φ):
//!
//! ```text
//! g(pH, φ) = g0 + 0.0591·log10(c) − nO·μ(H2O) + (nH − 2nO)·pH + φ·(−nH + 2nO + q)
//! ```
//!
//! [`plane::FreeEnergyPlane`] carries the three coefficients and
//! [`pourbaix_entry::PourbaixEntry`] derives them from an entry.
//! [`diagram::PourbaixDiagram`] holds the result of the hull construction.

pub mod constants;
pub mod diagram;
pub mod plane;
pub mod pourbaix_entry;
