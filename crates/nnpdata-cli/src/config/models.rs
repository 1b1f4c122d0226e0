use clap::ValueEnum;
use nnpdata::core::io::{lammps::LammpsOptions, vasp::PoscarOptions};
use nnpdata::core::units::UnitConversion;
use serde::Deserialize;

/// Named unit systems for converting file values into the canonical units.
#[derive(Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum UnitPreset {
    /// Keep values as they are in the files.
    Identity,
    /// Files in eV and Angstrom, canonical values in Hartree and Bohr.
    EvAngstrom,
    /// Files in kcal/mol and Angstrom, canonical values in Hartree and Bohr.
    KcalmolAngstrom,
}

impl From<UnitPreset> for UnitConversion {
    fn from(preset: UnitPreset) -> Self {
        match preset {
            UnitPreset::Identity => UnitConversion::identity(),
            UnitPreset::EvAngstrom => UnitConversion::ev_angstrom_to_hartree_bohr(),
            UnitPreset::KcalmolAngstrom => UnitConversion::kcalmol_angstrom_to_hartree_bohr(),
        }
    }
}

/// Fully resolved settings for one command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub units: UnitConversion,
    pub lammps: LammpsOptions,
    pub poscar: PoscarOptions,
    pub seed: u64,
}
