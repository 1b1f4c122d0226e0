//! # Core Models Module
//!
//! Data structures for atomistic training data: per-atom records, collective
//! (whole-sample) quantities, samples and datasets.
//!
//! ## Key Components
//!
//! - [`atom`] - A single atom with position, species, charge, energy and force
//! - [`collective`] - Cell geometry and total energy/charge of one sample
//! - [`sample`] - One snapshot: ordered atoms plus collective data, with aggregates and
//!   minimum-image distances
//! - [`builder`] - Incremental sample construction used by the format readers
//! - [`dataset`] - An ordered collection of samples with curation operations
//! - [`error`] - Errors raised by the data model
//!
//! ## Usage
//!
//! ```ignore
//! use nnpdata::core::models::{dataset::DataSet, builder::SampleBuilder};
//! use nalgebra::{Point3, Vector3};
//!
//! let mut builder = SampleBuilder::new();
//! builder.add_atom(Point3::new(0.0, 0.0, 0.0), "H", 0.0, 0.0, Vector3::zeros());
//! builder.cell_from_slice(&[10.0, 0.0, 0.0, 0.0, 10.0, 0.0, 0.0, 0.0, 10.0]);
//! let sample = builder.build_with_atomic_totals()?;
//!
//! let mut dataset = DataSet::new();
//! dataset.append(sample);
//! ```

pub mod atom;
pub mod builder;
pub mod collective;
pub mod dataset;
pub mod error;
pub mod sample;
