use super::models::UnitPreset;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileUnitsConfig {
    pub preset: Option<UnitPreset>,
    pub energy: Option<f64>,
    pub length: Option<f64>,
    pub charge: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLammpsConfig {
    #[serde(rename = "species-map")]
    pub species_map: Option<HashMap<String, String>>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileVaspConfig {
    pub species: Option<Vec<String>>,
    #[serde(rename = "scaling-factor")]
    pub scaling_factor: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileCurationConfig {
    pub seed: Option<u64>,
}

/// The TOML configuration file. Every section and key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub units: Option<FileUnitsConfig>,
    pub lammps: Option<FileLammpsConfig>,
    pub vasp: Option<FileVaspConfig>,
    pub curation: Option<FileCurationConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn empty_file_is_all_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert!(config.units.is_none());
        assert!(config.lammps.is_none());
        assert!(config.vasp.is_none());
        assert!(config.curation.is_none());
    }

    #[test]
    fn full_file_is_parsed() {
        let config = FileConfig::from_toml(
            r#"
            [units]
            preset = "ev-angstrom"
            charge = 2.0

            [lammps]
            species-map = { "1" = "O", "2" = "H" }

            [vasp]
            species = ["O", "H"]
            scaling-factor = 1.5

            [curation]
            seed = 99
            "#,
        )
        .unwrap();

        let units = config.units.unwrap();
        assert_eq!(units.preset, Some(UnitPreset::EvAngstrom));
        assert_eq!(units.charge, Some(2.0));
        assert_eq!(units.energy, None);
        let map = config.lammps.unwrap().species_map.unwrap();
        assert_eq!(map["2"], "H");
        let vasp = config.vasp.unwrap();
        assert_eq!(vasp.species.unwrap(), vec!["O", "H"]);
        assert_eq!(vasp.scaling_factor, Some(1.5));
        assert_eq!(config.curation.unwrap().seed, Some(99));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[units]\nmass = 1.0\n").is_err());
        assert!(FileConfig::from_toml("[output]\nformat = \"runner\"\n").is_err());
    }

    #[test]
    fn unknown_preset_is_rejected() {
        assert!(FileConfig::from_toml("[units]\npreset = \"furlongs\"\n").is_err());
    }

    #[test]
    fn from_file_reports_path_on_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[units\n").unwrap();

        match FileConfig::from_file(&path) {
            Err(CliError::FileParsing { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            FileConfig::from_file(&dir.path().join("absent.toml")),
            Err(CliError::Io(_))
        ));
    }
}
