use nalgebra::{Point3, Vector3};

/// A single atom within a sample.
///
/// All quantities are stored in canonical units. The struct is a plain data carrier;
/// fields are public so that adaptors can patch values read from a second file
/// (for example forces taken from a VASP OUTCAR).
#[derive(Debug, Clone, PartialEq)]
pub struct AtomicData {
    /// 1-based identifier, unique within the owning sample.
    pub id: usize,
    /// Cartesian position.
    pub position: Point3<f64>,
    /// Species token, usually an element symbol (e.g. "Cu", "O").
    pub species: String,
    /// Atomic charge.
    pub charge: f64,
    /// Per-atom energy contribution.
    pub energy: f64,
    /// Cartesian force acting on the atom.
    pub force: Vector3<f64>,
}

impl AtomicData {
    pub fn new(
        id: usize,
        position: Point3<f64>,
        species: &str,
        charge: f64,
        energy: f64,
        force: Vector3<f64>,
    ) -> Self {
        Self {
            id,
            position,
            species: species.to_string(),
            charge,
            energy,
            force,
        }
    }

    /// Creates an atom carrying only identity, position and species.
    ///
    /// Charge, energy and force are zero, as produced by geometry-only formats.
    pub fn at_position(id: usize, position: Point3<f64>, species: &str) -> Self {
        Self::new(id, position, species, 0.0, 0.0, Vector3::zeros())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_stores_all_fields() {
        let atom = AtomicData::new(
            3,
            Point3::new(1.0, 2.0, 3.0),
            "O",
            -0.8,
            -1.5,
            Vector3::new(0.1, 0.2, 0.3),
        );
        assert_eq!(atom.id, 3);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(atom.species, "O");
        assert_eq!(atom.charge, -0.8);
        assert_eq!(atom.energy, -1.5);
        assert_eq!(atom.force, Vector3::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn at_position_zeroes_physical_quantities() {
        let atom = AtomicData::at_position(1, Point3::new(0.5, 0.0, 0.0), "Cu");
        assert_eq!(atom.charge, 0.0);
        assert_eq!(atom.energy, 0.0);
        assert_eq!(atom.force, Vector3::zeros());
    }

    #[test]
    fn force_can_be_patched_after_construction() {
        let mut atom = AtomicData::at_position(1, Point3::origin(), "H");
        atom.force = Vector3::new(1.0, 0.0, -1.0);
        assert_eq!(atom.force.x, 1.0);
        assert_eq!(atom.force.z, -1.0);
    }
}
