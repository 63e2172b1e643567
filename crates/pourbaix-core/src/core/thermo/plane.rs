use nalgebra::Vector3;
use std::ops::Sub;

/// An affine free-energy function `g(pH, φ) = constant + ph_coeff·pH + potential_coeff·φ`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FreeEnergyPlane {
    pub ph_coeff: f64,
    pub potential_coeff: f64,
    pub constant: f64,
}

impl FreeEnergyPlane {
    pub fn new(ph_coeff: f64, potential_coeff: f64, constant: f64) -> Self {
        Self {
            ph_coeff,
            potential_coeff,
            constant,
        }
    }

    #[inline]
    pub fn evaluate(&self, ph: f64, potential: f64) -> f64 {
        self.constant + self.ph_coeff * ph + self.potential_coeff * potential
    }

    /// Coefficients as `(ph_coeff, potential_coeff, constant)`.
    #[inline]
    pub fn coefficients(&self) -> Vector3<f64> {
        Vector3::new(self.ph_coeff, self.potential_coeff, self.constant)
    }

    pub fn is_coincident(&self, other: &Self, tolerance: f64) -> bool {
        (self.coefficients() - other.coefficients()).amax() <= tolerance
    }

    pub fn shifted(&self, delta: f64) -> Self {
        Self {
            constant: self.constant + delta,
            ..*self
        }
    }
}

impl Sub for FreeEnergyPlane {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            ph_coeff: self.ph_coeff - rhs.ph_coeff,
            potential_coeff: self.potential_coeff - rhs.potential_coeff,
            constant: self.constant - rhs.constant,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluate_is_affine_in_ph_and_potential() {
        let plane = FreeEnergyPlane::new(2.0, -3.0, 1.0);
        assert_eq!(plane.evaluate(0.0, 0.0), 1.0);
        assert_eq!(plane.evaluate(1.0, 0.0), 3.0);
        assert_eq!(plane.evaluate(0.0, 1.0), -2.0);
        assert_eq!(plane.evaluate(7.0, -1.0), 18.0);
    }

    #[test]
    fn sub_subtracts_each_coefficient() {
        let a = FreeEnergyPlane::new(2.0, -3.0, 1.0);
        let b = FreeEnergyPlane::new(1.0, 1.0, 1.0);
        assert_eq!(a - b, FreeEnergyPlane::new(1.0, -4.0, 0.0));
    }

    #[test]
    fn coincident_planes_are_detected_within_tolerance() {
        let a = FreeEnergyPlane::new(2.0, -3.0, 1.0);
        assert!(a.is_coincident(&a.shifted(1e-12), 1e-9));
        assert!(!a.is_coincident(&a.shifted(1e-3), 1e-9));
    }
}
