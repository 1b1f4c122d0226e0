use crate::config::UnitPreset;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "nnpdata developers",
    version,
    about = "nnpconv - Convert and curate atomistic training data for neural network potentials (RuNNer, LAMMPS dump, VASP POSCAR/OUTCAR).",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Read samples in one format, optionally curate them, and write them in another.
    Convert(ConvertArgs),
    /// Print sample counts, atom counts and the mean species composition of input files.
    Inspect(InspectArgs),
}

/// File formats understood by the converter.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// RuNNer input.data structure files.
    Runner,
    /// LAMMPS text dump with columns `id x y z type q e fx fy fz`.
    Lammps,
    /// VASP POSCAR in Cartesian coordinates (one structure per file).
    Poscar,
}

/// Settings shared by every subcommand that reads data.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the unit preset from the config file.
    #[arg(short, long, value_enum, value_name = "PRESET")]
    pub units: Option<UnitPreset>,

    /// Override the POSCAR species list, in the order of the per-type counts.
    /// Example: --species O,H
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub species: Vec<String>,

    /// Override the seed for random sampling.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,
}

/// Arguments for the `convert` subcommand.
///
/// Curation runs in a fixed order: `--delete`, then `--select`, then `--sample`.
#[derive(Args, Debug)]
pub struct ConvertArgs {
    // --- Core Arguments ---
    /// Format of the input files.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: Format,

    /// Format of the output.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub to: Format,

    /// Input files. Samples are appended in the order the files are given.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Output file. For POSCAR output this is the base name of the numbered files.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub output: PathBuf,

    #[command(flatten)]
    pub settings: SettingsArgs,

    // --- Curation ---
    /// Remove the samples at these 0-based indices.
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub delete: Vec<usize>,

    /// Keep only the samples at these 0-based indices, in the given order.
    #[arg(long, value_delimiter = ',', value_name = "LIST")]
    pub select: Vec<usize>,

    /// Keep a seeded random subset of this many samples.
    #[arg(long, value_name = "INT")]
    pub sample: Option<usize>,

    // --- VASP ---
    /// OUTCAR whose forces and total energy are applied to the samples of a single
    /// POSCAR input.
    #[arg(long, value_name = "PATH")]
    pub outcar: Option<PathBuf>,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Format of the input files.
    #[arg(long, value_enum, value_name = "FORMAT")]
    pub from: Format,

    /// Input files.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,
}
