pub use crate::core::thermo::diagram::DomainLimits;
use crate::core::models::entry::DEFAULT_ION_CONCENTRATION;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("Invalid domain limits: pH {ph:?}, potential {potential:?}")]
    InvalidLimits {
        ph: (f64, f64),
        potential: (f64, f64),
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiagramConfig {
    /// Energy credit granted to the compound, in meV per atom.
    pub metastability_mev_per_atom: f64,
    /// Concentration (mol/kg) applied to every ionic entry.
    pub ion_concentration: f64,
    pub limits: DomainLimits,
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            metastability_mev_per_atom: 0.0,
            ion_concentration: DEFAULT_ION_CONCENTRATION,
            limits: DomainLimits::default(),
        }
    }
}

#[derive(Default)]
pub struct DiagramConfigBuilder {
    metastability_mev_per_atom: Option<f64>,
    ion_concentration: Option<f64>,
    limits: Option<DomainLimits>,
}

impl DiagramConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metastability(mut self, mev_per_atom: f64) -> Self {
        self.metastability_mev_per_atom = Some(mev_per_atom);
        self
    }
    pub fn ion_concentration(mut self, concentration: f64) -> Self {
        self.ion_concentration = Some(concentration);
        self
    }
    pub fn limits(mut self, limits: DomainLimits) -> Self {
        self.limits = Some(limits);
        self
    }

    pub fn build(self) -> Result<DiagramConfig, ConfigError> {
        let defaults = DiagramConfig::default();

        let metastability = self
            .metastability_mev_per_atom
            .unwrap_or(defaults.metastability_mev_per_atom);
        if !metastability.is_finite() || metastability < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "metastability",
                value: metastability,
                reason: "must be a finite, non-negative energy",
            });
        }

        let ion_concentration = self
            .ion_concentration
            .unwrap_or(defaults.ion_concentration);
        if !ion_concentration.is_finite() || ion_concentration <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "ion_concentration",
                value: ion_concentration,
                reason: "must be a finite, positive concentration",
            });
        }

        let limits = self.limits.unwrap_or(defaults.limits);
        if !limits.is_valid() {
            return Err(ConfigError::InvalidLimits {
                ph: limits.ph,
                potential: limits.potential,
            });
        }

        Ok(DiagramConfig {
            metastability_mev_per_atom: metastability,
            ion_concentration,
            limits,
        })
    }
}
