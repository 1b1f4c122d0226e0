//! # nnpdata
//!
//! Data model and file-format adaptors for atomistic training data used by
//! high-dimensional neural network potentials.
//!
//! ## Architectural Philosophy
//!
//! - **[`core::models`]: The Data Model.** A [`DataSet`](core::models::dataset::DataSet)
//!   owns an ordered list of [`Sample`](core::models::sample::Sample)s. Each sample holds
//!   its per-atom records and one set of collective (whole-system) quantities. Derived
//!   aggregates, periodic distances and dataset curation live here.
//!
//! - **[`core::units`]: Unit Conversion.** All values in the data model are stored in a
//!   single canonical unit system. Conversion happens only at the adaptor boundary.
//!
//! - **[`core::io`]: Format Adaptors.** Independent readers and writers for the RuNNer,
//!   LAMMPS dump and VASP POSCAR/OUTCAR text formats. They share nothing but two small
//!   traits: one for producing samples and one for consuming them.

pub mod core;
