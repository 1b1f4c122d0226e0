use super::read_inputs;
use crate::cli::InspectArgs;
use crate::config::build_config;
use crate::error::Result;
use nnpdata::core::models::dataset::DataSet;
use std::fmt::Write;

pub fn run(args: InspectArgs) -> Result<()> {
    let config = build_config(&args.settings)?;
    let dataset = read_inputs(args.from, &args.input, &config)?;
    print!("{}", summarize(&dataset));
    Ok(())
}

/// Renders the sample count, atom count range and mean composition of a dataset.
fn summarize(dataset: &DataSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Samples: {}", dataset.sample_count());

    let counts = dataset.iter().map(|s| s.atom_count());
    let (Some(min), Some(max)) = (counts.clone().min(), counts.max()) else {
        return out;
    };
    let _ = writeln!(out, "Atoms per sample: {} to {}", min, max);

    if let Ok(histogram) = dataset.species_histogram_normalized() {
        let mut species: Vec<_> = histogram.into_iter().collect();
        species.sort_by(|a, b| a.0.cmp(&b.0));
        let _ = writeln!(out, "Mean atoms per sample by species:");
        for (name, mean) in species {
            let _ = writeln!(out, "  {:<4} {:.4}", name, mean);
        }
    }
    out
}
