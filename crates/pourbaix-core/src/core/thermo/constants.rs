/// `kT ln(10) / e` at 298.15 K, in volts.
pub const PREFAC: f64 = 0.0591;

/// Reference chemical potential of liquid water, in eV.
pub const MU_H2O: f64 = -2.4583;
