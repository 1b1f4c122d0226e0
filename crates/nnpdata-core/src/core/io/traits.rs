use super::error::FormatError;
use crate::core::models::dataset::DataSet;
use crate::core::models::sample::Sample;
use crate::core::units::UnitConversion;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A file format that can produce samples.
///
/// Readers receive the conversion from file units to canonical units and apply it
/// to every parsed quantity before the sample is built.
pub trait SampleSource {
    /// Format-specific reading options (e.g. a species map).
    type Options: Default;

    /// Reads every sample contained in the input, in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is malformed or an I/O operation fails. No
    /// samples are returned in that case.
    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<Vec<Sample>, FormatError>;

    /// Reads samples and appends them to `dataset`, returning how many were added.
    ///
    /// The dataset is only extended once the whole input has been parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails; `dataset` is unchanged in that case.
    fn read_into(
        reader: &mut impl BufRead,
        dataset: &mut DataSet,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<usize, FormatError> {
        let samples = Self::read_from(reader, options, units)?;
        let count = samples.len();
        dataset.extend(samples);
        Ok(count)
    }

    /// Reads every sample from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<Vec<Sample>, FormatError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, options, units)
    }

    /// Reads a file and appends its samples to `dataset`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_path_into<P: AsRef<Path>>(
        path: P,
        dataset: &mut DataSet,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<usize, FormatError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_into(&mut reader, dataset, options, units)
    }
}

/// A file format that can consume samples.
///
/// Writers receive the same file-to-canonical conversion that was used for reading
/// and apply its inverse before formatting values.
pub trait SampleSink {
    /// Format-specific writing options.
    type Options: Default;

    /// Writes one sample. `index` is the 0-based position of the sample in the
    /// sequence being written.
    ///
    /// # Errors
    ///
    /// Returns an error if the sample cannot be represented or writing fails.
    fn write_sample(
        sample: &Sample,
        index: usize,
        writer: &mut impl Write,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<(), FormatError>;

    /// Writes every sample of a dataset in order.
    ///
    /// # Errors
    ///
    /// Returns an error if any sample cannot be written.
    fn write_to(
        dataset: &DataSet,
        writer: &mut impl Write,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        for (index, sample) in dataset.iter().enumerate() {
            Self::write_sample(sample, index, writer, options, units)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Writes every sample of a dataset to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        dataset: &DataSet,
        path: P,
        options: &Self::Options,
        units: &UnitConversion,
    ) -> Result<(), FormatError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(dataset, &mut writer, options, units)
    }
}
