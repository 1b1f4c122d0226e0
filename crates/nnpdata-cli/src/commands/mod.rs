pub mod convert;
pub mod inspect;

use crate::cli::Format;
use crate::config::AppConfig;
use crate::error::{CliError, Result};
use nnpdata::core::io::{
    error::FormatError,
    lammps::LammpsDumpFile,
    runner::{RunnerFile, RunnerWriteOptions},
    traits::{SampleSink, SampleSource},
    vasp::PoscarFile,
};
use nnpdata::core::models::dataset::DataSet;
use std::path::{Path, PathBuf};
use tracing::info;

fn file_error(path: &Path, error: FormatError) -> CliError {
    CliError::FileParsing {
        path: path.to_path_buf(),
        source: error.into(),
    }
}

/// Reads every input file in order into one dataset.
pub(crate) fn read_inputs(format: Format, inputs: &[PathBuf], config: &AppConfig) -> Result<DataSet> {
    let mut dataset = DataSet::new();
    for path in inputs {
        info!("Loading {:?} samples from {:?}", format, path);
        let added = match format {
            Format::Runner => RunnerFile::read_path_into(path, &mut dataset, &(), &config.units),
            Format::Lammps => {
                LammpsDumpFile::read_path_into(path, &mut dataset, &config.lammps, &config.units)
            }
            Format::Poscar => {
                PoscarFile::read_path_into(path, &mut dataset, &config.poscar, &config.units)
            }
        }
        .map_err(|e| file_error(path, e))?;
        info!("Read {} samples from {:?}", added, path);
    }
    Ok(dataset)
}

/// Writes the dataset and returns the files that were created.
pub(crate) fn write_output(
    format: Format,
    output: &Path,
    dataset: &DataSet,
    config: &AppConfig,
) -> Result<Vec<PathBuf>> {
    let written = match format {
        Format::Runner => RunnerFile::write_to_path(
            dataset,
            output,
            &RunnerWriteOptions::default(),
            &config.units,
        )
        .map(|()| vec![output.to_path_buf()]),
        Format::Lammps => {
            LammpsDumpFile::write_to_path(dataset, output, &config.lammps, &config.units)
                .map(|()| vec![output.to_path_buf()])
        }
        Format::Poscar => PoscarFile::write_numbered(dataset, output, &config.poscar, &config.units),
    }
    .map_err(|e| file_error(output, e))?;
    Ok(written)
}
