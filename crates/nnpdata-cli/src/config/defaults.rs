use super::models::UnitPreset;
use nnpdata::core::models::dataset::DEFAULT_SEED;

pub struct DefaultsConfig {
    pub units: UnitPreset,
    pub scaling_factor: f64,
    pub seed: u64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            units: UnitPreset::Identity,
            scaling_factor: 1.0,
            seed: DEFAULT_SEED,
        }
    }
}
