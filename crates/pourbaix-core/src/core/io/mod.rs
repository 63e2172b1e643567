//! Persisting diagrams: a standalone PDF plot and a TOML summary.

pub mod pdf;
pub mod summary;
pub mod traits;

/// File stem for a compound's artifacts: `MoS2`, or `MoS2_50meV` when a
/// metastability tolerance was applied.
pub fn artifact_stem(reduced_formula: &str, metastability_mev_per_atom: f64) -> String {
    if metastability_mev_per_atom == 0.0 {
        reduced_formula.to_string()
    } else {
        format!("{}_{}meV", reduced_formula, metastability_mev_per_atom)
    }
}
