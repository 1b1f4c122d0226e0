use nalgebra::{Point3, Vector3};
use thiserror::Error;

/// Bohr radii per Angstrom.
pub const ANGSTROM_TO_BOHR: f64 = 1.8897261328;
/// Hartree per electronvolt.
pub const EV_TO_HARTREE: f64 = 0.0367493254;
/// Hartree per kcal/mol.
pub const KCALMOL_TO_HARTREE: f64 = 0.001593602;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum UnitError {
    #[error("Cannot invert unit conversion: {name} factor is zero")]
    ZeroFactor { name: &'static str },
}

/// Multiplicative factors that map raw file units onto the canonical unit system.
///
/// Readers multiply every parsed quantity by the matching factor; writers apply the
/// [`inverse`](UnitConversion::inverse) before formatting. The force factor is always
/// derived as `energy / length` and cannot be set independently.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    energy: f64,
    length: f64,
    charge: f64,
}

impl Default for UnitConversion {
    fn default() -> Self {
        Self::identity()
    }
}

impl UnitConversion {
    /// Creates a conversion from explicit energy, length and charge factors.
    pub fn new(energy: f64, length: f64, charge: f64) -> Self {
        Self {
            energy,
            length,
            charge,
        }
    }

    /// The no-op conversion: every factor is `1.0`.
    pub fn identity() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// Electronvolt/Angstrom files into Hartree/Bohr canonical units.
    pub fn ev_angstrom_to_hartree_bohr() -> Self {
        Self::new(EV_TO_HARTREE, ANGSTROM_TO_BOHR, 1.0)
    }

    /// kcal/mol/Angstrom files into Hartree/Bohr canonical units.
    pub fn kcalmol_angstrom_to_hartree_bohr() -> Self {
        Self::new(KCALMOL_TO_HARTREE, ANGSTROM_TO_BOHR, 1.0)
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn charge(&self) -> f64 {
        self.charge
    }

    pub fn force(&self) -> f64 {
        self.energy / self.length
    }

    /// Returns a conversion whose factors are the reciprocals of this one.
    ///
    /// # Errors
    ///
    /// Returns [`UnitError::ZeroFactor`] if any of the energy, length or charge
    /// factors is exactly zero.
    pub fn inverse(&self) -> Result<Self, UnitError> {
        let recip = |value: f64, name: &'static str| {
            if value == 0.0 {
                Err(UnitError::ZeroFactor { name })
            } else {
                Ok(1.0 / value)
            }
        };
        Ok(Self {
            energy: recip(self.energy, "energy")?,
            length: recip(self.length, "length")?,
            charge: recip(self.charge, "charge")?,
        })
    }

    pub fn scale_energy(&self, value: f64) -> f64 {
        value * self.energy
    }

    pub fn scale_length(&self, value: f64) -> f64 {
        value * self.length
    }

    pub fn scale_charge(&self, value: f64) -> f64 {
        value * self.charge
    }

    pub fn scale_force(&self, value: f64) -> f64 {
        value * self.force()
    }

    pub fn scale_position(&self, position: &Point3<f64>) -> Point3<f64> {
        Point3::from(position.coords * self.length)
    }

    pub fn scale_force_vector(&self, force: &Vector3<f64>) -> Vector3<f64> {
        force.map(|component| self.scale_force(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn default_is_identity() {
        let uc = UnitConversion::default();
        assert_eq!(uc.energy(), 1.0);
        assert_eq!(uc.length(), 1.0);
        assert_eq!(uc.charge(), 1.0);
        assert_eq!(uc.force(), 1.0);
    }

    #[test]
    fn force_factor_is_energy_over_length() {
        let uc = UnitConversion::new(2.0, 4.0, 1.0);
        assert!(approx_eq(uc.force(), 0.5));
    }

    #[test]
    fn inverse_reciprocates_every_factor() {
        let uc = UnitConversion::new(2.0, 3.0, 5.0);
        let inv = uc.inverse().unwrap();
        assert!(approx_eq(inv.energy(), 0.5));
        assert!(approx_eq(inv.length(), 1.0 / 3.0));
        assert!(approx_eq(inv.charge(), 0.2));
        assert!(approx_eq(inv.force(), 1.5));
    }

    #[test]
    fn inverse_restores_raw_energy() {
        let uc = UnitConversion::new(2.0, 3.0, 1.0);
        let inv = uc.inverse().unwrap();
        assert!(approx_eq(inv.scale_energy(6.0), 3.0));
    }

    #[test]
    fn inverse_fails_on_zero_factor() {
        assert_eq!(
            UnitConversion::new(1.0, 0.0, 1.0).inverse(),
            Err(UnitError::ZeroFactor { name: "length" })
        );
        assert_eq!(
            UnitConversion::new(0.0, 1.0, 1.0).inverse(),
            Err(UnitError::ZeroFactor { name: "energy" })
        );
        assert_eq!(
            UnitConversion::new(1.0, 1.0, 0.0).inverse(),
            Err(UnitError::ZeroFactor { name: "charge" })
        );
    }

    #[test]
    fn inverse_does_not_mutate_original() {
        let uc = UnitConversion::ev_angstrom_to_hartree_bohr();
        let _ = uc.inverse().unwrap();
        assert_eq!(uc.energy(), EV_TO_HARTREE);
        assert_eq!(uc.length(), ANGSTROM_TO_BOHR);
    }

    #[test]
    fn vector_scaling_uses_matching_factor() {
        let uc = UnitConversion::new(4.0, 2.0, 1.0);
        let p = uc.scale_position(&Point3::new(1.0, 2.0, 3.0));
        assert_eq!(p, Point3::new(2.0, 4.0, 6.0));
        let f = uc.scale_force_vector(&Vector3::new(1.0, -1.0, 0.5));
        assert_eq!(f, Vector3::new(2.0, -2.0, 1.0));
    }

    #[test]
    fn scalar_scalers_use_matching_factor() {
        let uc = UnitConversion::new(4.0, 2.0, 3.0);
        assert_eq!(uc.scale_energy(1.5), 6.0);
        assert_eq!(uc.scale_length(1.5), 3.0);
        assert_eq!(uc.scale_charge(-1.0), -3.0);
        assert_eq!(uc.scale_force(0.25), 0.5);
    }
}
