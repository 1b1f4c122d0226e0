//! # Core Module
//!
//! Building blocks for reading, holding, curating and writing atomistic samples.
//!
//! - **Units** ([`units`]) - Conversion factors between file units and canonical units
//! - **Data Model** ([`models`]) - Atoms, collective data, samples and datasets
//! - **File I/O** ([`io`]) - RuNNer, LAMMPS and VASP adaptors

pub mod io;
pub mod models;
pub mod units;
