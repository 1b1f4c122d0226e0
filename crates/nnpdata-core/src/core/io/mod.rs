//! Provides readers and writers for atomistic training-data file formats.
//!
//! Each format is an independent adaptor that turns text into
//! [`Sample`](crate::core::models::sample::Sample)s or writes samples back out. The
//! adaptors share two small traits, [`traits::SampleSource`] and
//! [`traits::SampleSink`], and a line cursor that tracks line numbers for error
//! reporting.
//!
//! - [`runner`] - RuNNer `input.data` structure files (read and write)
//! - [`lammps`] - LAMMPS text dump files with orthogonal boxes (read and write)
//! - [`vasp`] - VASP POSCAR geometry (read and write) and OUTCAR forces/energy (read)

pub mod error;
pub mod lammps;
pub(crate) mod lines;
pub mod runner;
pub mod traits;
pub mod vasp;
