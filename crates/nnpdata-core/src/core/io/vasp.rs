use super::error::{FormatError, ParseErrorKind};
use super::lines::{LineCursor, parse_f64, parse_usize};
use super::traits::{SampleSink, SampleSource};
use crate::core::models::builder::SampleBuilder;
use crate::core::models::dataset::DataSet;
use crate::core::models::error::ModelError;
use crate::core::models::sample::Sample;
use crate::core::units::UnitConversion;
use nalgebra::{Point3, Vector3};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Options for reading and writing POSCAR files.
#[derive(Debug, Clone, PartialEq)]
pub struct PoscarOptions {
    /// Species names, one per entry of the per-type counts line.
    ///
    /// When empty, the reader falls back to the element-symbol line of the file and
    /// the writer uses the order in which species first appear in the sample.
    pub species: Vec<String>,
    /// Universal scaling factor written to the second line of output files.
    pub scaling_factor: f64,
}

impl Default for PoscarOptions {
    fn default() -> Self {
        Self {
            species: Vec::new(),
            scaling_factor: 1.0,
        }
    }
}

/// VASP POSCAR structure files in Cartesian coordinates.
///
/// A POSCAR holds a single structure without charges, energies or forces; those
/// are zero after reading until an OUTCAR is applied with [`OutcarFile`].
pub struct PoscarFile;

impl PoscarFile {
    fn read_structure<R: BufRead>(
        cursor: &mut LineCursor<'_, R>,
        options: &PoscarOptions,
        units: &UnitConversion,
    ) -> Result<Sample, FormatError> {
        let mut scale_fields = cursor.expect_fields("scaling factor")?;
        let line = scale_fields.line();
        let scale = scale_fields.next_f64("scaling factor")?;
        if scale <= 0.0 {
            return Err(FormatError::Unsupported(format!(
                "non-positive POSCAR scaling factor {} on line {}",
                scale, line
            )));
        }
        let factor = scale * units.length();

        let mut builder = SampleBuilder::new();
        for _ in 0..3 {
            let [x, y, z] = cursor.expect_fields("lattice vector")?.next_xyz("lattice vector")?;
            builder.lattice_vector(x * factor, y * factor, z * factor);
        }

        let (mut line_num, mut line) = cursor.expect_line("per-type atom counts")?;
        let mut symbols = Vec::new();
        let starts_with_count = line
            .split_whitespace()
            .next()
            .is_some_and(|token| token.parse::<usize>().is_ok());
        if !starts_with_count {
            symbols = line.split_whitespace().map(str::to_string).collect();
            (line_num, line) = cursor.expect_line("per-type atom counts")?;
        }
        let counts = line
            .split_whitespace()
            .map(|token| parse_usize(token, "atom count", line_num))
            .collect::<Result<Vec<_>, _>>()?;

        let species = if !options.species.is_empty() {
            options.species.clone()
        } else if !symbols.is_empty() {
            symbols
        } else {
            return Err(FormatError::Inconsistency(
                "POSCAR has no element symbols and no species were given".into(),
            ));
        };
        if species.len() != counts.len() {
            return Err(FormatError::Inconsistency(format!(
                "{} species names for {} atom types",
                species.len(),
                counts.len()
            )));
        }

        let (mut line_num, mut line) = cursor.expect_line("coordinate mode")?;
        if line.trim_start().to_ascii_lowercase().starts_with('s') {
            (line_num, line) = cursor.expect_line("coordinate mode")?;
        }
        let cartesian = matches!(
            line.trim_start().chars().next().map(|c| c.to_ascii_lowercase()),
            Some('c') | Some('k')
        );
        if !cartesian {
            return Err(FormatError::Unsupported(format!(
                "only Cartesian POSCAR coordinates are supported, found '{}' on line {}",
                line.trim(),
                line_num
            )));
        }

        for (name, &count) in species.iter().zip(&counts) {
            for _ in 0..count {
                let [x, y, z] = cursor.expect_fields("atom position")?.next_xyz("atom position")?;
                builder.add_atom(
                    Point3::new(x * factor, y * factor, z * factor),
                    name,
                    0.0,
                    0.0,
                    Vector3::zeros(),
                );
            }
        }

        debug!("Read POSCAR with {} atoms.", builder.atom_count());
        Ok(builder.build_with_atomic_totals()?)
    }

    fn species_order(sample: &Sample, options: &PoscarOptions) -> Vec<String> {
        if !options.species.is_empty() {
            return options.species.clone();
        }
        let mut order: Vec<String> = Vec::new();
        for atom in sample.atoms() {
            if !order.contains(&atom.species) {
                order.push(atom.species.clone());
            }
        }
        order
    }

    /// Writes every sample to its own file named `<base>_<n>`, with `n` counting
    /// from 1, and returns the paths written.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be created or a sample cannot be written.
    pub fn write_numbered<P: AsRef<Path>>(
        dataset: &DataSet,
        base: P,
        options: &PoscarOptions,
        units: &UnitConversion,
    ) -> Result<Vec<PathBuf>, FormatError> {
        let mut written = Vec::with_capacity(dataset.sample_count());
        for (index, sample) in dataset.iter().enumerate() {
            let mut name = base.as_ref().as_os_str().to_owned();
            name.push(format!("_{}", index + 1));
            let path = PathBuf::from(name);

            let mut writer = BufWriter::new(File::create(&path)?);
            Self::write_sample(sample, index, &mut writer, options, units)?;
            writer.flush()?;
            written.push(path);
        }
        debug!("Wrote {} POSCAR files.", written.len());
        Ok(written)
    }
}

impl SampleSource for PoscarFile {
    type Options = PoscarOptions;

    #[instrument(level = "debug", skip_all, name = "poscar_read")]
    fn read_from(
        reader: &mut impl BufRead,
        options: &PoscarOptions,
        units: &UnitConversion,
    ) -> Result<Vec<Sample>, FormatError> {
        let mut cursor = LineCursor::new(reader);
        cursor.expect_line("POSCAR comment")?;
        Ok(vec![Self::read_structure(&mut cursor, options, units)?])
    }
}

impl SampleSink for PoscarFile {
    type Options = PoscarOptions;

    fn write_sample(
        sample: &Sample,
        _index: usize,
        writer: &mut impl Write,
        options: &PoscarOptions,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let inverse = units.inverse()?;
        let collective = sample
            .collective()
            .ok_or(ModelError::MissingCollectiveData)?;
        if options.scaling_factor <= 0.0 {
            return Err(FormatError::Unsupported(format!(
                "non-positive POSCAR scaling factor {}",
                options.scaling_factor
            )));
        }
        let factor = inverse.length() / options.scaling_factor;

        let species = Self::species_order(sample, options);
        let counts: Vec<usize> = species
            .iter()
            .map(|s| sample.count_with_species(s))
            .collect();
        let listed: usize = counts.iter().sum();
        if listed != sample.atom_count() {
            return Err(FormatError::Inconsistency(format!(
                "{} of {} atoms have a species outside [{}]",
                sample.atom_count() - listed,
                sample.atom_count(),
                species.join(", ")
            )));
        }

        writeln!(writer, ", ATOM={}", species.join(" "))?;
        writeln!(writer, "{:15.10}", options.scaling_factor)?;
        for i in 0..3 {
            let v = collective.lattice_vector(i) * factor;
            writeln!(writer, "{:15.10} {:15.10} {:15.10}", v.x, v.y, v.z)?;
        }
        // A numeric name on the symbol line would be read as the counts line.
        if !species.iter().any(|name| name.parse::<f64>().is_ok()) {
            writeln!(writer, "{}", species.join(" "))?;
        }
        writeln!(
            writer,
            "{}",
            counts
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        )?;
        writeln!(writer, "Cartesian")?;
        for name in &species {
            for atom in sample.atoms_with_species(name) {
                let p = atom.position.coords * factor;
                writeln!(writer, "{:15.10} {:15.10} {:15.10}", p.x, p.y, p.z)?;
            }
        }
        Ok(())
    }
}

/// Forces and total energy from a VASP OUTCAR.
pub struct OutcarFile;

impl OutcarFile {
    /// Overwrites the forces and total energy of `sample` with values from an OUTCAR.
    ///
    /// Each `POSITION` block is followed by a separator line and one row per atom,
    /// whose fourth to sixth columns are the force. Each line containing `TOTEN`
    /// carries the total energy in its second-to-last column. When a file contains
    /// several ionic steps the last block and the last energy win.
    ///
    /// # Errors
    ///
    /// Returns an error if a row is malformed, the file ends inside a force block, or
    /// an energy is found but `sample` has no collective data.
    #[instrument(level = "debug", skip_all, fields(atoms = sample.atom_count()))]
    pub fn patch_sample(
        reader: &mut impl BufRead,
        sample: &mut Sample,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let mut cursor = LineCursor::new(reader);
        let n_atoms = sample.atom_count();
        let mut forces: Option<Vec<Vector3<f64>>> = None;
        let mut total_energy: Option<f64> = None;
        let mut force_blocks = 0;

        while let Some((line_num, line)) = cursor.next_line()? {
            if line.contains("POSITION") {
                cursor.expect_line("OUTCAR force block separator")?;
                let mut block = Vec::with_capacity(n_atoms);
                for _ in 0..n_atoms {
                    let [fx, fy, fz] = cursor
                        .expect_fields("OUTCAR force row")?
                        .skip(3)
                        .next_xyz("force")?;
                    block.push(units.scale_force_vector(&Vector3::new(fx, fy, fz)));
                }
                forces = Some(block);
                force_blocks += 1;
            } else if line.contains("TOTEN") {
                let tokens: Vec<&str> = line.split_whitespace().collect();
                let value = tokens.len().checked_sub(2).map(|i| tokens[i]).ok_or_else(|| {
                    FormatError::parse(
                        line_num,
                        ParseErrorKind::MissingField {
                            field: "total energy",
                        },
                    )
                })?;
                total_energy = Some(units.scale_energy(parse_f64(value, "total energy", line_num)?));
            }
        }

        // The sample is only touched once the whole file has parsed.
        if let Some(energy) = total_energy {
            sample
                .collective_mut()
                .ok_or(ModelError::MissingCollectiveData)?
                .total_energy = energy;
        }
        if let Some(forces) = forces {
            for (atom, force) in sample.atoms_mut().iter_mut().zip(forces) {
                atom.force = force;
            }
        }

        debug!("Applied {} OUTCAR force blocks.", force_blocks);
        Ok(())
    }

    /// Applies the OUTCAR at `path` to `sample`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or [`patch_sample`](Self::patch_sample) fails.
    pub fn patch_sample_from_path<P: AsRef<Path>>(
        path: P,
        sample: &mut Sample,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::patch_sample(&mut reader, sample, units)
    }
}

/// Reads a structure from a POSCAR and completes it with the forces and energy of
/// the matching OUTCAR.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn read_vasp<P: AsRef<Path>, Q: AsRef<Path>>(
    poscar: P,
    outcar: Q,
    options: &PoscarOptions,
    units: &UnitConversion,
) -> Result<Sample, FormatError> {
    let mut reader = BufReader::new(File::open(poscar)?);
    let mut cursor = LineCursor::new(&mut reader);
    cursor.expect_line("POSCAR comment")?;
    let mut sample = PoscarFile::read_structure(&mut cursor, options, units)?;
    OutcarFile::patch_sample_from_path(outcar, &mut sample, units)?;
    Ok(sample)
}
