use super::atom::AtomicData;
use super::collective::CollectiveData;
use super::error::ModelError;
use nalgebra::{Matrix3, Vector3};
use std::collections::HashMap;

/// One simulation snapshot: an ordered list of atoms plus collective data.
///
/// Atom order is the insertion order and is preserved on export. Collective data is
/// attached once all atoms are known; a sample without it can still answer atom-level
/// queries, but fails on anything that needs the cell or the reported totals.
///
/// The sum of per-atom energies is not required to match the collective total
/// energy. Some formats report the total directly, others derive it by summation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sample {
    atomic: Vec<AtomicData>,
    collective: Option<CollectiveData>,
}

impl Sample {
    /// Creates an empty sample with no atoms and no collective data.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_atom(&mut self, atom: AtomicData) -> &mut Self {
        self.atomic.push(atom);
        self
    }

    pub fn atoms(&self) -> &[AtomicData] {
        &self.atomic
    }

    pub fn atoms_mut(&mut self) -> &mut [AtomicData] {
        &mut self.atomic
    }

    pub fn collective(&self) -> Option<&CollectiveData> {
        self.collective.as_ref()
    }

    pub fn collective_mut(&mut self) -> Option<&mut CollectiveData> {
        self.collective.as_mut()
    }

    pub fn set_collective(&mut self, collective: CollectiveData) -> &mut Self {
        self.collective = Some(collective);
        self
    }

    /// Attaches collective data whose totals are recomputed from the atoms.
    pub fn set_collective_from_atomic_sums(&mut self, cell: Matrix3<f64>) -> &mut Self {
        let collective =
            CollectiveData::new(cell, self.sum_atomic_energy(), self.sum_atomic_charge());
        self.set_collective(collective)
    }

    pub fn atom_count(&self) -> usize {
        self.atomic.len()
    }

    fn require_collective(&self) -> Result<&CollectiveData, ModelError> {
        self.collective
            .as_ref()
            .ok_or(ModelError::MissingCollectiveData)
    }

    /// Total energy as stored in the collective data.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingCollectiveData`] if no collective data is attached.
    pub fn total_energy(&self) -> Result<f64, ModelError> {
        Ok(self.require_collective()?.total_energy)
    }

    /// Total charge as stored in the collective data.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingCollectiveData`] if no collective data is attached.
    pub fn total_charge(&self) -> Result<f64, ModelError> {
        Ok(self.require_collective()?.total_charge)
    }

    /// Sum of the per-atom energies. Zero for a sample without atoms.
    pub fn sum_atomic_energy(&self) -> f64 {
        self.atomic.iter().map(|atom| atom.energy).sum()
    }

    /// Sum of the per-atom charges. Zero for a sample without atoms.
    pub fn sum_atomic_charge(&self) -> f64 {
        self.atomic.iter().map(|atom| atom.charge).sum()
    }

    /// Atoms of the given species, in their original order.
    pub fn atoms_with_species(&self, species: &str) -> Vec<&AtomicData> {
        self.atomic
            .iter()
            .filter(|atom| atom.species == species)
            .collect()
    }

    pub fn count_with_species(&self, species: &str) -> usize {
        self.atomic
            .iter()
            .filter(|atom| atom.species == species)
            .count()
    }

    /// Number of atoms per species. Only species present at least once appear.
    pub fn species_histogram(&self) -> HashMap<String, usize> {
        let mut histogram = HashMap::new();
        for atom in &self.atomic {
            *histogram.entry(atom.species.clone()).or_insert(0) += 1;
        }
        histogram
    }

    /// Squared distance between two atoms under the minimum-image convention.
    ///
    /// Only the diagonal of the cell is used, so the result is meaningful for
    /// orthogonal cells only. For each axis a displacement larger than half the box
    /// length is folded back by one box length.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingCollectiveData`] if no cell is available.
    pub fn squared_distance(&self, a: &AtomicData, b: &AtomicData) -> Result<f64, ModelError> {
        let box_lengths = self.require_collective()?.box_lengths();
        let delta = minimum_image(b.position - a.position, &box_lengths);
        Ok(delta.norm_squared())
    }

    /// Distance between two atoms under the minimum-image convention.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingCollectiveData`] if no cell is available.
    pub fn distance(&self, a: &AtomicData, b: &AtomicData) -> Result<f64, ModelError> {
        Ok(self.squared_distance(a, b)?.sqrt())
    }
}

fn minimum_image(mut delta: Vector3<f64>, box_lengths: &Vector3<f64>) -> Vector3<f64> {
    for axis in 0..3 {
        let length = box_lengths[axis];
        if delta[axis] > 0.5 * length {
            delta[axis] -= length;
        } else if delta[axis] < -0.5 * length {
            delta[axis] += length;
        }
    }
    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn cubic_cell(length: f64) -> Matrix3<f64> {
        Matrix3::from_diagonal_element(length)
    }

    fn atom(id: usize, species: &str, x: f64, charge: f64, energy: f64) -> AtomicData {
        AtomicData::new(
            id,
            Point3::new(x, 0.0, 0.0),
            species,
            charge,
            energy,
            Vector3::zeros(),
        )
    }

    fn water_like_sample() -> Sample {
        let mut sample = Sample::new();
        sample
            .push_atom(atom(1, "O", 0.0, -0.8, -2.0))
            .push_atom(atom(2, "H", 1.0, 0.4, -0.5))
            .push_atom(atom(3, "H", 2.0, 0.4, -0.25));
        sample.set_collective(CollectiveData::new(cubic_cell(10.0), -10.0, 0.0));
        sample
    }

    mod aggregates {
        use super::*;

        #[test]
        fn atom_count_matches_pushed_atoms() {
            assert_eq!(water_like_sample().atom_count(), 3);
            assert_eq!(Sample::new().atom_count(), 0);
        }

        #[test]
        fn atomic_sums_add_every_atom() {
            let sample = water_like_sample();
            assert_eq!(sample.sum_atomic_energy(), -2.75);
            assert!((sample.sum_atomic_charge()).abs() < 1e-12);
        }

        #[test]
        fn atomic_sums_of_empty_sample_are_zero() {
            let sample = Sample::new();
            assert_eq!(sample.sum_atomic_energy(), 0.0);
            assert_eq!(sample.sum_atomic_charge(), 0.0);
        }

        #[test]
        fn totals_come_from_collective_data_not_atoms() {
            let sample = water_like_sample();
            assert_eq!(sample.total_energy(), Ok(-10.0));
            assert_eq!(sample.total_charge(), Ok(0.0));
            assert_ne!(sample.total_energy().unwrap(), sample.sum_atomic_energy());
        }

        #[test]
        fn totals_fail_without_collective_data() {
            let mut sample = Sample::new();
            sample.push_atom(atom(1, "H", 0.0, 0.0, 1.0));
            assert_eq!(sample.total_energy(), Err(ModelError::MissingCollectiveData));
            assert_eq!(sample.total_charge(), Err(ModelError::MissingCollectiveData));
        }

        #[test]
        fn collective_from_atomic_sums_copies_sums() {
            let mut sample = Sample::new();
            sample
                .push_atom(atom(1, "Na", 0.0, 1.0, -1.0))
                .push_atom(atom(2, "Cl", 1.0, -1.0, -2.0));
            sample.set_collective_from_atomic_sums(cubic_cell(5.0));
            assert_eq!(sample.total_energy(), Ok(-3.0));
            assert_eq!(sample.total_charge(), Ok(0.0));
        }
    }

    mod species {
        use super::*;

        #[test]
        fn atoms_with_species_preserves_order() {
            let sample = water_like_sample();
            let hydrogens = sample.atoms_with_species("H");
            let ids: Vec<usize> = hydrogens.iter().map(|a| a.id).collect();
            assert_eq!(ids, vec![2, 3]);
            assert_eq!(sample.count_with_species("H"), hydrogens.len());
        }

        #[test]
        fn absent_species_yields_nothing() {
            let sample = water_like_sample();
            assert!(sample.atoms_with_species("C").is_empty());
            assert_eq!(sample.count_with_species("C"), 0);
        }

        #[test]
        fn histogram_counts_each_present_species() {
            let histogram = water_like_sample().species_histogram();
            assert_eq!(histogram.len(), 2);
            assert_eq!(histogram["O"], 1);
            assert_eq!(histogram["H"], 2);
        }
    }

    mod geometry {
        use super::*;

        #[test]
        fn minimum_image_folds_long_displacement() {
            let mut sample = Sample::new();
            sample
                .push_atom(atom(1, "A", 0.5, 0.0, 0.0))
                .push_atom(atom(2, "B", 9.6, 0.0, 0.0));
            sample.set_collective(CollectiveData::new(cubic_cell(10.0), 0.0, 0.0));
            let (a, b) = (&sample.atoms()[0], &sample.atoms()[1]);
            let d2 = sample.squared_distance(a, b).unwrap();
            assert!((d2 - 0.81).abs() < 1e-9);
            assert!((sample.distance(a, b).unwrap() - 0.9).abs() < 1e-9);
        }

        #[test]
        fn squared_distance_is_symmetric() {
            let mut sample = Sample::new();
            sample
                .push_atom(AtomicData::at_position(1, Point3::new(1.0, 8.5, 0.2), "X"))
                .push_atom(AtomicData::at_position(2, Point3::new(7.3, 0.4, 5.9), "Y"));
            sample.set_collective(CollectiveData::new(
                Matrix3::from_diagonal(&Vector3::new(8.0, 9.0, 10.0)),
                0.0,
                0.0,
            ));
            let (a, b) = (&sample.atoms()[0], &sample.atoms()[1]);
            let ab = sample.squared_distance(a, b).unwrap();
            let ba = sample.squared_distance(b, a).unwrap();
            assert!((ab - ba).abs() < 1e-12);
        }

        #[test]
        fn short_displacement_is_unchanged() {
            let sample = water_like_sample();
            let (o, h) = (&sample.atoms()[0], &sample.atoms()[2]);
            assert!((sample.squared_distance(o, h).unwrap() - 4.0).abs() < 1e-12);
        }

        #[test]
        fn negative_displacement_wraps_forward() {
            let mut sample = Sample::new();
            sample
                .push_atom(AtomicData::at_position(1, Point3::new(0.0, 9.0, 0.0), "X"))
                .push_atom(AtomicData::at_position(2, Point3::new(0.0, 1.0, 0.0), "X"));
            sample.set_collective(CollectiveData::new(cubic_cell(10.0), 0.0, 0.0));
            let (a, b) = (&sample.atoms()[0], &sample.atoms()[1]);
            assert!((sample.distance(a, b).unwrap() - 2.0).abs() < 1e-12);
        }

        #[test]
        fn off_diagonal_cell_terms_are_ignored() {
            let mut sample = Sample::new();
            sample
                .push_atom(atom(1, "A", 0.5, 0.0, 0.0))
                .push_atom(atom(2, "B", 9.6, 0.0, 0.0));
            let cell = Matrix3::new(10.0, 3.0, 3.0, 3.0, 10.0, 3.0, 3.0, 3.0, 10.0);
            sample.set_collective(CollectiveData::new(cell, 0.0, 0.0));
            let (a, b) = (&sample.atoms()[0], &sample.atoms()[1]);
            assert!((sample.squared_distance(a, b).unwrap() - 0.81).abs() < 1e-9);
        }

        #[test]
        fn distance_fails_without_cell() {
            let mut sample = Sample::new();
            sample
                .push_atom(atom(1, "A", 0.0, 0.0, 0.0))
                .push_atom(atom(2, "B", 1.0, 0.0, 0.0));
            let (a, b) = (&sample.atoms()[0], &sample.atoms()[1]);
            assert_eq!(
                sample.squared_distance(a, b),
                Err(ModelError::MissingCollectiveData)
            );
            assert_eq!(sample.distance(a, b), Err(ModelError::MissingCollectiveData));
        }
    }
}
