use super::error::{FormatError, ParseErrorKind};
use super::lines::LineCursor;
use super::traits::{SampleSink, SampleSource};
use crate::core::models::builder::SampleBuilder;
use crate::core::models::error::ModelError;
use crate::core::models::sample::Sample;
use crate::core::units::UnitConversion;
use nalgebra::{Point3, Vector3};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use tracing::{debug, instrument, trace};

const ATOMS_HEADER: &str = "ITEM: ATOMS id x y z type q c_eatom fx fy fz";

/// Options shared by the LAMMPS reader and writer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LammpsOptions {
    /// Maps the dump's atom type column (e.g. "1") onto a species (e.g. "O").
    ///
    /// When unset, the type column is used verbatim as the species. The writer uses
    /// the reverse mapping; when several types map to one species, the numerically
    /// lowest type is written.
    pub species_map: Option<HashMap<String, String>>,
}

impl LammpsOptions {
    fn species_for_type(&self, atom_type: &str, line: usize) -> Result<String, FormatError> {
        match &self.species_map {
            None => Ok(atom_type.to_string()),
            Some(map) => map.get(atom_type).cloned().ok_or_else(|| {
                FormatError::parse(line, ParseErrorKind::UnknownType(atom_type.to_string()))
            }),
        }
    }

    fn type_for_species<'a>(&'a self, species: &'a str) -> Result<&'a str, FormatError> {
        match &self.species_map {
            None => Ok(species),
            // Several types may share a species; the lowest type wins.
            Some(map) => map
                .iter()
                .filter(|(_, s)| s.as_str() == species)
                .map(|(t, _)| t.as_str())
                .min_by_key(|t| (t.parse::<u64>().unwrap_or(u64::MAX), *t))
                .ok_or_else(|| {
                    FormatError::Inconsistency(format!(
                        "No LAMMPS atom type is mapped to species '{}'",
                        species
                    ))
                }),
        }
    }
}

/// LAMMPS text dump files with orthogonal boxes.
///
/// Atom rows must carry the columns `id x y z type q e fx fy fz` in that order.
/// Per-frame totals are not part of the format, so they are recomputed from the
/// atoms. Box lengths become the cell diagonal; triclinic boxes are rejected.
pub struct LammpsDumpFile;

impl LammpsDumpFile {
    fn expect_item<R: BufRead>(
        cursor: &mut LineCursor<'_, R>,
        item: &'static str,
    ) -> Result<String, FormatError> {
        let (line_num, line) = cursor.expect_line(item)?;
        let trimmed = line.trim();
        if !trimmed.starts_with(item) {
            return Err(FormatError::parse(
                line_num,
                ParseErrorKind::UnexpectedRecord {
                    found: trimmed.to_string(),
                    expected: item,
                },
            ));
        }
        Ok(trimmed.to_string())
    }

    fn read_frame<R: BufRead>(
        cursor: &mut LineCursor<'_, R>,
        options: &LammpsOptions,
        units: &UnitConversion,
    ) -> Result<Sample, FormatError> {
        let timestep = cursor.expect_fields("timestep value")?.next_usize("timestep")?;

        Self::expect_item(cursor, "ITEM: NUMBER OF ATOMS")?;
        let n_atoms = cursor
            .expect_fields("number of atoms")?
            .next_usize("number of atoms")?;

        let bounds_header = Self::expect_item(cursor, "ITEM: BOX BOUNDS")?;
        if ["xy", "xz", "yz"]
            .iter()
            .any(|tilt| bounds_header.split_whitespace().any(|t| t == *tilt))
        {
            return Err(FormatError::Unsupported(
                "triclinic LAMMPS boxes are not supported".into(),
            ));
        }

        let mut builder = SampleBuilder::new();
        let mut cell = [0.0; 9];
        for axis in 0..3 {
            let mut fields = cursor.expect_fields("box bounds")?;
            let lo = fields.next_f64("box lower bound")?;
            let hi = fields.next_f64("box upper bound")?;
            cell[axis * 4] = units.scale_length(hi - lo);
        }
        builder.cell_from_slice(&cell);

        Self::expect_item(cursor, "ITEM: ATOMS")?;
        for _ in 0..n_atoms {
            let mut fields = cursor.expect_fields("atom row")?;
            let id = fields.next_usize("atom id")?;
            let [x, y, z] = fields.next_xyz("atom position")?;
            let atom_type = fields.next_str("atom type")?;
            let charge = fields.next_f64("atom charge")?;
            let energy = fields.next_f64("atom energy")?;
            let [fx, fy, fz] = fields.next_xyz("atom force")?;
            let species = options.species_for_type(atom_type, fields.line())?;

            builder.add_atom_with_id(
                id,
                units.scale_position(&Point3::new(x, y, z)),
                &species,
                units.scale_charge(charge),
                units.scale_energy(energy),
                units.scale_force_vector(&Vector3::new(fx, fy, fz)),
            );
        }

        trace!("Parsed LAMMPS timestep {} with {} atoms.", timestep, n_atoms);
        Ok(builder.build_with_atomic_totals()?)
    }
}

impl SampleSource for LammpsDumpFile {
    type Options = LammpsOptions;

    #[instrument(level = "debug", skip_all, name = "lammps_read")]
    fn read_from(
        reader: &mut impl BufRead,
        options: &LammpsOptions,
        units: &UnitConversion,
    ) -> Result<Vec<Sample>, FormatError> {
        let mut cursor = LineCursor::new(reader);
        let mut samples = Vec::new();

        while let Some((line_num, line)) = cursor.next_line()? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !trimmed.starts_with("ITEM: TIMESTEP") {
                return Err(FormatError::parse(
                    line_num,
                    ParseErrorKind::UnexpectedRecord {
                        found: trimmed.to_string(),
                        expected: "ITEM: TIMESTEP",
                    },
                ));
            }
            samples.push(Self::read_frame(&mut cursor, options, units)?);
        }

        debug!("Read {} LAMMPS frames.", samples.len());
        Ok(samples)
    }
}

impl SampleSink for LammpsDumpFile {
    type Options = LammpsOptions;

    fn write_sample(
        sample: &Sample,
        index: usize,
        writer: &mut impl Write,
        options: &LammpsOptions,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let inverse = units.inverse()?;
        let collective = sample
            .collective()
            .ok_or(ModelError::MissingCollectiveData)?;
        let cell = collective.cell;
        if cell != nalgebra::Matrix3::from_diagonal(&cell.diagonal()) {
            return Err(FormatError::Unsupported(
                "LAMMPS dump output requires an orthogonal cell".into(),
            ));
        }
        let lengths = collective.box_lengths() * inverse.length();

        writeln!(writer, "ITEM: TIMESTEP")?;
        writeln!(writer, "{}", index)?;
        writeln!(writer, "ITEM: NUMBER OF ATOMS")?;
        writeln!(writer, "{}", sample.atom_count())?;
        writeln!(writer, "ITEM: BOX BOUNDS pp pp pp")?;
        for length in lengths.iter() {
            writeln!(writer, "{:.10} {:.10}", 0.0, length)?;
        }
        writeln!(writer, "{}", ATOMS_HEADER)?;
        for atom in sample.atoms() {
            let p = inverse.scale_position(&atom.position);
            let f = inverse.scale_force_vector(&atom.force);
            writeln!(
                writer,
                "{} {:.10} {:.10} {:.10} {} {:.10} {:.10} {:.10} {:.10} {:.10}",
                atom.id,
                p.x,
                p.y,
                p.z,
                options.type_for_species(&atom.species)?,
                inverse.scale_charge(atom.charge),
                inverse.scale_energy(atom.energy),
                f.x,
                f.y,
                f.z
            )?;
        }
        Ok(())
    }
}
