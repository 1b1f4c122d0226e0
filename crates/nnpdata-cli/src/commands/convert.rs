use super::{read_inputs, write_output};
use crate::cli::{ConvertArgs, Format};
use crate::config::{AppConfig, build_config};
use crate::error::{CliError, Result};
use nnpdata::core::io::vasp::OutcarFile;
use nnpdata::core::models::dataset::DataSet;
use tracing::{debug, info};

pub fn run(args: ConvertArgs) -> Result<()> {
    let config = build_config(&args.settings)?;
    debug!("Resolved configuration: {:?}", config);

    if args.outcar.is_some() && args.from != Format::Poscar {
        return Err(CliError::Argument(
            "--outcar can only be combined with --from poscar".to_string(),
        ));
    }
    if args.outcar.is_some() && args.input.len() != 1 {
        return Err(CliError::Argument(
            "--outcar requires exactly one POSCAR input".to_string(),
        ));
    }

    let mut dataset = read_inputs(args.from, &args.input, &config)?;
    info!("Loaded {} samples in total.", dataset.sample_count());

    if let Some(outcar) = &args.outcar {
        info!("Applying OUTCAR {:?} to {} samples", outcar, dataset.sample_count());
        for sample in dataset.samples_mut() {
            OutcarFile::patch_sample_from_path(outcar, sample, &config.units).map_err(|e| {
                CliError::FileParsing {
                    path: outcar.clone(),
                    source: e.into(),
                }
            })?;
        }
    }

    curate(&mut dataset, &args, &config)?;

    let written = write_output(args.to, &args.output, &dataset, &config)?;
    println!(
        "Wrote {} samples to {} file(s), starting with {}",
        dataset.sample_count(),
        written.len(),
        written
            .first()
            .map_or_else(|| args.output.display().to_string(), |p| p.display().to_string())
    );
    Ok(())
}

fn curate(dataset: &mut DataSet, args: &ConvertArgs, config: &AppConfig) -> Result<()> {
    if !args.delete.is_empty() {
        dataset.delete(&args.delete);
        info!("{} samples left after deletion.", dataset.sample_count());
    }
    if !args.select.is_empty() {
        dataset
            .select(&args.select)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        info!("{} samples left after selection.", dataset.sample_count());
    }
    if let Some(count) = args.sample {
        dataset
            .random_subset(Some(count), config.seed)
            .map_err(|e| CliError::Argument(e.to_string()))?;
        info!(
            "Kept a random subset of {} samples (seed {}).",
            count, config.seed
        );
    }
    Ok(())
}
