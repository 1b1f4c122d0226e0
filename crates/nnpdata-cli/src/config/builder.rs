use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileUnitsConfig};
use super::models::AppConfig;
use crate::cli::SettingsArgs;
use crate::error::{CliError, Result};
use nnpdata::core::io::{lammps::LammpsOptions, vasp::PoscarOptions};
use nnpdata::core::units::UnitConversion;

/// Resolves the settings for a command: CLI flags win over the config file, which
/// wins over the built-in defaults.
pub fn build_config(args: &SettingsArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let mut file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let units = merge_units(
        args,
        file_config.units.take().unwrap_or_default(),
        &defaults,
    )?;

    let lammps = LammpsOptions {
        species_map: file_config.lammps.take().and_then(|l| l.species_map),
    };

    let vasp_file = file_config.vasp.take().unwrap_or_default();
    let species = if args.species.is_empty() {
        vasp_file.species.unwrap_or_default()
    } else {
        args.species.clone()
    };
    let scaling_factor = vasp_file
        .scaling_factor
        .unwrap_or(defaults.scaling_factor);
    if !(scaling_factor.is_finite() && scaling_factor > 0.0) {
        return Err(CliError::Config(format!(
            "`vasp.scaling-factor` must be positive, got {}",
            scaling_factor
        )));
    }

    let seed = args
        .seed
        .or(file_config.curation.take().and_then(|c| c.seed))
        .unwrap_or(defaults.seed);

    Ok(AppConfig {
        units,
        lammps,
        poscar: PoscarOptions {
            species,
            scaling_factor,
        },
        seed,
    })
}

fn merge_units(
    args: &SettingsArgs,
    units_file: FileUnitsConfig,
    defaults: &DefaultsConfig,
) -> Result<UnitConversion> {
    let preset: UnitConversion = args
        .units
        .or(units_file.preset)
        .unwrap_or(defaults.units)
        .into();

    let energy = units_file.energy.unwrap_or(preset.energy());
    let length = units_file.length.unwrap_or(preset.length());
    let charge = units_file.charge.unwrap_or(preset.charge());

    for (name, value) in [("energy", energy), ("length", length), ("charge", charge)] {
        if !value.is_finite() || value == 0.0 {
            return Err(CliError::Config(format!(
                "`units.{}` must be a finite, non-zero factor, got {}",
                name, value
            )));
        }
    }

    Ok(UnitConversion::new(energy, length, charge))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitPreset;
    use nnpdata::core::models::dataset::DEFAULT_SEED;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nnpconv.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let config = build_config(&SettingsArgs::default()).unwrap();
        assert_eq!(config.units, UnitConversion::identity());
        assert_eq!(config.lammps, LammpsOptions::default());
        assert_eq!(config.poscar, PoscarOptions::default());
        assert_eq!(config.seed, DEFAULT_SEED);
    }

    #[test]
    fn file_values_are_used() {
        let (_dir, path) = write_config(
            r#"
            [units]
            preset = "ev-angstrom"

            [lammps]
            species-map = { "1" = "Cu" }

            [vasp]
            species = ["Cu"]
            scaling-factor = 2.0

            [curation]
            seed = 7
            "#,
        );
        let args = SettingsArgs {
            config: Some(path),
            ..Default::default()
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.units, UnitConversion::ev_angstrom_to_hartree_bohr());
        assert_eq!(
            config.lammps.species_map.unwrap()["1"],
            "Cu".to_string()
        );
        assert_eq!(config.poscar.species, vec!["Cu"]);
        assert_eq!(config.poscar.scaling_factor, 2.0);
        assert_eq!(config.seed, 7);
    }

    #[test]
    fn cli_flags_override_file() {
        let (_dir, path) = write_config(
            r#"
            [units]
            preset = "ev-angstrom"

            [vasp]
            species = ["Cu"]

            [curation]
            seed = 7
            "#,
        );
        let args = SettingsArgs {
            config: Some(path),
            units: Some(UnitPreset::Identity),
            species: vec!["O".into(), "H".into()],
            seed: Some(11),
        };

        let config = build_config(&args).unwrap();
        assert_eq!(config.units, UnitConversion::identity());
        assert_eq!(config.poscar.species, vec!["O", "H"]);
        assert_eq!(config.seed, 11);
    }

    #[test]
    fn explicit_factors_override_preset_components() {
        let (_dir, path) = write_config("[units]\npreset = \"ev-angstrom\"\ncharge = 0.5\n");
        let args = SettingsArgs {
            config: Some(path),
            ..Default::default()
        };

        let units = build_config(&args).unwrap().units;
        let preset = UnitConversion::ev_angstrom_to_hartree_bohr();
        assert_eq!(units.energy(), preset.energy());
        assert_eq!(units.length(), preset.length());
        assert_eq!(units.charge(), 0.5);
    }

    #[test]
    fn zero_unit_factor_is_a_config_error() {
        let (_dir, path) = write_config("[units]\nlength = 0.0\n");
        let args = SettingsArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }

    #[test]
    fn negative_scaling_factor_is_a_config_error() {
        let (_dir, path) = write_config("[vasp]\nscaling-factor = -1.0\n");
        let args = SettingsArgs {
            config: Some(path),
            ..Default::default()
        };
        assert!(matches!(build_config(&args), Err(CliError::Config(_))));
    }
}
