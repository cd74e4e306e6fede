//! Validator configuration
//!
//! Settings come from, in order of precedence:
//! - A YAML or JSON file named by `TXOVA_VALIDATION_CONFIG`
//! - Built-in defaults
//!
//! Missing keys fall back to their defaults, so a file only needs the values
//! it overrides.

use crate::error::{Error, Result};
use crate::geo::{BoundingBox, MOZAMBIQUE_BOUNDS};
use crate::vehicle::MIN_VEHICLE_YEAR;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable holding the path of a configuration file
pub const CONFIG_ENV_VAR: &str = "TXOVA_VALIDATION_CONFIG";

/// Tunables consumed by the struct validator's Txova rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Box every `mz_location` field must fall inside
    pub country_bounds: BoundingBox,

    /// Oldest model year accepted by `txova_vehicle_year`
    pub min_vehicle_year: i32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            country_bounds: MOZAMBIQUE_BOUNDS,
            min_vehicle_year: MIN_VEHICLE_YEAR,
        }
    }
}

impl ValidatorConfig {
    /// Parse and check a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and check a JSON document
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file; the format follows the extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            Some("json") => Self::from_json_str(&content),
            _ => Err(Error::config(format!(
                "unsupported configuration file {}: expected .yaml, .yml or .json",
                path.display()
            ))),
        }
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) if !path.is_empty() => Self::from_path(Path::new(&path)),
            _ => Ok(Self::default()),
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<()> {
        let b = &self.country_bounds;
        let finite = [b.min_lat, b.max_lat, b.min_lon, b.max_lon]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::config("country_bounds must be finite"));
        }
        if b.min_lat > b.max_lat {
            return Err(Error::config(format!(
                "country_bounds.min_lat ({}) is greater than max_lat ({})",
                b.min_lat, b.max_lat
            )));
        }
        if b.min_lon > b.max_lon {
            return Err(Error::config(format!(
                "country_bounds.min_lon ({}) is greater than max_lon ({})",
                b.min_lon, b.max_lon
            )));
        }
        Ok(())
    }
}
