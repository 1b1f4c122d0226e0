use super::error::ModelError;
use nalgebra::{Matrix3, Vector3};

/// Number of scalar components in a flattened 3x3 cell.
pub const CELL_COMPONENTS: usize = 9;

/// Whole-sample quantities: simulation cell, total energy and total charge.
///
/// The cell is stored row-major, each row being one lattice vector. Only orthogonal
/// cells are supported by the geometry routines, which read the diagonal as box
/// lengths and ignore the off-diagonal entries.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectiveData {
    pub cell: Matrix3<f64>,
    pub total_energy: f64,
    pub total_charge: f64,
}

impl Default for CollectiveData {
    fn default() -> Self {
        Self::new(Matrix3::zeros(), 0.0, 0.0)
    }
}

impl CollectiveData {
    pub fn new(cell: Matrix3<f64>, total_energy: f64, total_charge: f64) -> Self {
        Self {
            cell,
            total_energy,
            total_charge,
        }
    }

    /// Builds collective data from a flat, row-major list of cell components.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MalformedCell`] unless exactly nine values are given.
    pub fn from_flat_cell(
        cell: &[f64],
        total_energy: f64,
        total_charge: f64,
    ) -> Result<Self, ModelError> {
        if cell.len() != CELL_COMPONENTS {
            return Err(ModelError::MalformedCell { found: cell.len() });
        }
        Ok(Self::new(
            Matrix3::from_row_slice(cell),
            total_energy,
            total_charge,
        ))
    }

    /// Cell components in row-major order.
    pub fn cell_row_major(&self) -> [f64; CELL_COMPONENTS] {
        let mut flat = [0.0; CELL_COMPONENTS];
        for row in 0..3 {
            for col in 0..3 {
                flat[row * 3 + col] = self.cell[(row, col)];
            }
        }
        flat
    }

    /// Lattice vector `index` (0, 1 or 2) as a row of the cell matrix.
    pub(crate) fn lattice_vector(&self, index: usize) -> Vector3<f64> {
        self.cell.row(index).transpose()
    }

    /// Orthogonal box lengths `(lx, ly, lz)` read from the cell diagonal.
    pub fn box_lengths(&self) -> Vector3<f64> {
        self.cell.diagonal()
    }
}
