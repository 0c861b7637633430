use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Initial inventory of the three resource places. The net structure itself
/// is compiled in; only these counts are configurable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SimConfig {
    #[serde(default = "default_cups")]
    pub cups: u64,
    #[serde(default = "default_coffee_doses")]
    pub coffee_doses: u64,
    #[serde(default = "default_water_doses")]
    pub water_doses: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cups: default_cups(),
            coffee_doses: default_coffee_doses(),
            water_doses: default_water_doses(),
        }
    }
}

impl SimConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: SimConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        Ok(config)
    }
}

fn default_cups() -> u64 {
    10
}

fn default_coffee_doses() -> u64 {
    50
}

fn default_water_doses() -> u64 {
    100
}
