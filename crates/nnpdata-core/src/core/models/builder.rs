use super::atom::AtomicData;
use super::collective::CollectiveData;
use super::error::ModelError;
use super::sample::Sample;
use nalgebra::{Point3, Vector3};

/// Incremental construction of a [`Sample`] while a frame is being parsed.
///
/// Atoms receive 1-based ids in the order they are added unless an explicit id is
/// given. Cell components accumulate until [`build`](Self::build) validates that
/// exactly nine were supplied.
#[derive(Debug)]
pub struct SampleBuilder {
    sample: Sample,

    // --- Builder-specific state for the frame under construction ---
    next_id: usize,
    cell: Vec<f64>,
}

impl Default for SampleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleBuilder {
    pub fn new() -> Self {
        Self {
            sample: Sample::new(),
            next_id: 1,
            cell: Vec::with_capacity(9),
        }
    }

    /// Appends an atom with the next sequential id.
    pub fn add_atom(
        &mut self,
        position: Point3<f64>,
        species: &str,
        charge: f64,
        energy: f64,
        force: Vector3<f64>,
    ) -> &mut Self {
        let id = self.next_id;
        self.add_atom_with_id(id, position, species, charge, energy, force)
    }

    /// Appends an atom with an id taken from the source file.
    pub fn add_atom_with_id(
        &mut self,
        id: usize,
        position: Point3<f64>,
        species: &str,
        charge: f64,
        energy: f64,
        force: Vector3<f64>,
    ) -> &mut Self {
        self.sample
            .push_atom(AtomicData::new(id, position, species, charge, energy, force));
        self.next_id = id + 1;
        self
    }

    /// Appends one lattice vector (three cell components).
    pub fn lattice_vector(&mut self, x: f64, y: f64, z: f64) -> &mut Self {
        self.cell.extend_from_slice(&[x, y, z]);
        self
    }

    /// Appends raw cell components in row-major order.
    pub fn cell_from_slice(&mut self, components: &[f64]) -> &mut Self {
        self.cell.extend_from_slice(components);
        self
    }

    pub fn atom_count(&self) -> usize {
        self.sample.atom_count()
    }

    /// Finishes the sample using totals supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedCell`] if the accumulated cell does not have
    /// exactly nine components.
    pub fn build(self, total_energy: f64, total_charge: f64) -> Result<Sample, ModelError> {
        let collective = CollectiveData::from_flat_cell(&self.cell, total_energy, total_charge)?;
        let mut sample = self.sample;
        sample.set_collective(collective);
        Ok(sample)
    }

    /// Finishes the sample using totals recomputed from the atoms.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedCell`] if the accumulated cell does not have
    /// exactly nine components.
    pub fn build_with_atomic_totals(self) -> Result<Sample, ModelError> {
        let total_energy = self.sample.sum_atomic_energy();
        let total_charge = self.sample.sum_atomic_charge();
        self.build(total_energy, total_charge)
    }
}
