use super::error::{FormatError, ParseErrorKind};
use super::lines::{Fields, LineCursor};
use super::traits::{SampleSink, SampleSource};
use crate::core::models::builder::SampleBuilder;
use crate::core::models::error::ModelError;
use crate::core::models::sample::Sample;
use crate::core::units::UnitConversion;
use nalgebra::{Point3, Vector3};
use std::io::{BufRead, Write};
use tracing::{debug, instrument, trace};

const FRAME_RECORDS: &str = "one of comment, lattice, atom, energy, charge or end";

/// Options for writing RuNNer files.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunnerWriteOptions {
    /// Text for each frame's `comment` record. A generator note is used when unset.
    pub comment: Option<String>,
}

/// The RuNNer `input.data` structure format.
///
/// Each frame is delimited by `begin` and `end` and contains up to three `lattice`
/// records, one `atom` record per atom
/// (`x y z species charge energy fx fy fz`), and the reported total `energy` and
/// `charge` of the frame. Totals missing from a frame default to zero.
pub struct RunnerFile;

impl RunnerFile {
    fn read_frame<R: BufRead>(
        cursor: &mut LineCursor<'_, R>,
        units: &UnitConversion,
    ) -> Result<Sample, FormatError> {
        let mut builder = SampleBuilder::new();
        let mut total_energy = 0.0;
        let mut total_charge = 0.0;

        loop {
            let (line_num, line) = cursor.expect_line("a RuNNer frame ('end' record)")?;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = Fields::new(line, line_num);
            let keyword = fields.next_str("record keyword")?;

            match keyword {
                "comment" => {}
                "lattice" => {
                    let [x, y, z] = fields.next_xyz("lattice vector")?;
                    builder.lattice_vector(
                        units.scale_length(x),
                        units.scale_length(y),
                        units.scale_length(z),
                    );
                }
                "atom" => {
                    let [x, y, z] = fields.next_xyz("atom position")?;
                    let species = fields.next_str("atom species")?;
                    let charge = fields.next_f64("atom charge")?;
                    let energy = fields.next_f64("atom energy")?;
                    let [fx, fy, fz] = fields.next_xyz("atom force")?;
                    builder.add_atom(
                        units.scale_position(&Point3::new(x, y, z)),
                        species,
                        units.scale_charge(charge),
                        units.scale_energy(energy),
                        units.scale_force_vector(&Vector3::new(fx, fy, fz)),
                    );
                }
                "energy" => total_energy = units.scale_energy(fields.next_f64("total energy")?),
                "charge" => total_charge = units.scale_charge(fields.next_f64("total charge")?),
                "end" => break,
                other => {
                    return Err(FormatError::parse(
                        line_num,
                        ParseErrorKind::UnexpectedRecord {
                            found: other.to_string(),
                            expected: FRAME_RECORDS,
                        },
                    ));
                }
            }
        }

        trace!("Parsed RuNNer frame with {} atoms.", builder.atom_count());
        Ok(builder.build(total_energy, total_charge)?)
    }
}

impl SampleSource for RunnerFile {
    type Options = ();

    #[instrument(level = "debug", skip_all, name = "runner_read")]
    fn read_from(
        reader: &mut impl BufRead,
        _options: &(),
        units: &UnitConversion,
    ) -> Result<Vec<Sample>, FormatError> {
        let mut cursor = LineCursor::new(reader);
        let mut samples = Vec::new();

        while let Some((_, line)) = cursor.next_line()? {
            let starts_frame = line.split_whitespace().next() == Some("begin");
            if starts_frame {
                samples.push(Self::read_frame(&mut cursor, units)?);
            }
        }

        debug!("Read {} RuNNer frames.", samples.len());
        Ok(samples)
    }
}

impl SampleSink for RunnerFile {
    type Options = RunnerWriteOptions;

    fn write_sample(
        sample: &Sample,
        _index: usize,
        writer: &mut impl Write,
        options: &RunnerWriteOptions,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let inverse = units.inverse()?;
        let collective = sample
            .collective()
            .ok_or(ModelError::MissingCollectiveData)?;

        writeln!(writer, "begin")?;
        match &options.comment {
            Some(comment) => writeln!(writer, "comment {}", comment)?,
            None => writeln!(
                writer,
                "comment Generated by nnpdata {}",
                env!("CARGO_PKG_VERSION")
            )?,
        }

        for i in 0..3 {
            let v = collective.lattice_vector(i) * inverse.length();
            writeln!(writer, "lattice {:.10} {:.10} {:.10}", v.x, v.y, v.z)?;
        }

        for atom in sample.atoms() {
            let p = inverse.scale_position(&atom.position);
            let f = inverse.scale_force_vector(&atom.force);
            writeln!(
                writer,
                "atom {:15.10} {:15.10} {:15.10} {} {:15.10} {:15.10} {:15.10} {:15.10} {:15.10}",
                p.x,
                p.y,
                p.z,
                atom.species,
                inverse.scale_charge(atom.charge),
                inverse.scale_energy(atom.energy),
                f.x,
                f.y,
                f.z
            )?;
        }

        writeln!(
            writer,
            "energy {:.10}",
            inverse.scale_energy(collective.total_energy)
        )?;
        writeln!(
            writer,
            "charge {:.10}",
            inverse.scale_charge(collective.total_charge)
        )?;
        writeln!(writer, "end")?;
        Ok(())
    }
}
