//! Engine configuration profiles
//!
//! Interpretive switches the published tables leave to the assessor.
//! `standard` follows the tables literally; `conservative` never lets a
//! declared figure lower the classification and requires a complete CONOPS
//! before evaluating.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Environment variable holding the path of a YAML configuration file
pub const CONFIG_ENV: &str = "SORA_ENGINE_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("CONFIG/io: {0}")]
    Io(#[from] std::io::Error),

    #[error("CONFIG/yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("CONFIG/profile: unknown profile '{0}'")]
    UnknownProfile(String),
}

/// Speed used to derive typical kinetic energy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedBasis {
    MaxSpeed,
    CruiseSpeed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Profile name (e.g., "standard@1.0")
    pub name: String,

    /// Evaluate EVLOS on the BVLOS rows of the iGRC table
    pub evlos_on_bvlos_rows: bool,

    pub kinetic_energy_speed: SpeedBasis,

    /// Use a declared kinetic energy as is; otherwise take the higher of
    /// declared and computed
    pub trust_declared_kinetic_energy: bool,

    /// Reject snapshots with incomplete CONOPS fields before evaluating
    pub conops_completeness: bool,
}

impl EngineConfig {
    pub fn standard() -> Self {
        Self {
            name: "standard@1.0".to_string(),
            evlos_on_bvlos_rows: true,
            kinetic_energy_speed: SpeedBasis::MaxSpeed,
            trust_declared_kinetic_energy: true,
            conops_completeness: false,
        }
    }

    pub fn conservative() -> Self {
        Self {
            name: "conservative@1.0".to_string(),
            evlos_on_bvlos_rows: true,
            kinetic_energy_speed: SpeedBasis::MaxSpeed,
            trust_declared_kinetic_energy: false,
            conops_completeness: true,
        }
    }

    /// Profile by name, without version suffix
    pub fn for_profile(profile: &str) -> Result<Self, ConfigError> {
        match profile {
            "standard" => Ok(Self::standard()),
            "conservative" => Ok(Self::conservative()),
            other => Err(ConfigError::UnknownProfile(other.to_string())),
        }
    }

    /// Parse YAML; missing keys fall back to the standard profile
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml(&yaml)
    }

    /// Load from `SORA_ENGINE_CONFIG` when set, otherwise the standard profile
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV) {
            Ok(path) if !path.trim().is_empty() => {
                tracing::debug!(path = %path, "loading engine config");
                Self::load(path)
            }
            _ => Ok(Self::standard()),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::standard()
    }
}
