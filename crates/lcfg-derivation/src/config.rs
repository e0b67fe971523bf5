/*
 * config.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Sizing policy for [`DerivationMap`](crate::DerivationMap).
//!
//! The policy is plain data so it can be loaded from a TOML file:
//!
//! ```toml
//! initial_capacity = 113
//! max_load = 0.7
//! target_load = 0.5
//! ```
//!
//! Keys that are left out take their default.

use serde::{Deserialize, Serialize};

use crate::error::{DerivationError, DerivationResult};

/// Capacity and load factors for a derivation map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapConfig {
    /// Number of buckets in a fresh map.
    pub initial_capacity: usize,
    /// Load factor at which the map grows.
    pub max_load: f64,
    /// Load factor the map aims for after growing.
    pub target_load: f64,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 113,
            max_load: 0.7,
            target_load: 0.5,
        }
    }
}

impl MapConfig {
    /// Parse and validate a configuration from TOML.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_derivation::MapConfig;
    ///
    /// let config = MapConfig::from_toml_str("initial_capacity = 7").unwrap();
    /// assert_eq!(config.initial_capacity, 7);
    /// assert_eq!(config.max_load, 0.7);
    /// ```
    pub fn from_toml_str(input: &str) -> DerivationResult<MapConfig> {
        let config: MapConfig = toml::from_str(input).map_err(|e| DerivationError::Config {
            message: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the values describe a map that can always make room.
    pub fn validate(&self) -> DerivationResult<()> {
        if self.initial_capacity == 0 {
            return Err(config_error("initial_capacity must be at least 1"));
        }
        if !(self.max_load > 0.0 && self.max_load <= 1.0) {
            return Err(config_error(format!(
                "max_load must be in (0, 1], got {}",
                self.max_load
            )));
        }
        if !(self.target_load > 0.0 && self.target_load < self.max_load) {
            return Err(config_error(format!(
                "target_load must be in (0, max_load), got {} with max_load {}",
                self.target_load, self.max_load
            )));
        }
        Ok(())
    }
}

fn config_error(message: impl Into<String>) -> DerivationError {
    DerivationError::Config {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = MapConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.initial_capacity, 113);
    }

    #[test]
    fn test_from_toml_full() {
        let config = MapConfig::from_toml_str(
            "initial_capacity = 11\nmax_load = 0.9\ntarget_load = 0.25\n",
        )
        .unwrap();
        assert_eq!(
            config,
            MapConfig {
                initial_capacity: 11,
                max_load: 0.9,
                target_load: 0.25,
            }
        );
    }

    #[test]
    fn test_from_toml_empty_uses_defaults() {
        assert_eq!(MapConfig::from_toml_str("").unwrap(), MapConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = MapConfig::from_toml_str("capacity = 5").unwrap_err();
        assert_eq!(err.code(), "L-DRV-5");
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(MapConfig::from_toml_str("max_load = \"high\"").is_err());
    }

    #[test]
    fn test_validate_bounds() {
        let bad = [
            MapConfig {
                initial_capacity: 0,
                ..MapConfig::default()
            },
            MapConfig {
                max_load: 1.5,
                ..MapConfig::default()
            },
            MapConfig {
                max_load: 0.0,
                ..MapConfig::default()
            },
            MapConfig {
                target_load: 0.7,
                ..MapConfig::default()
            },
            MapConfig {
                target_load: 0.0,
                ..MapConfig::default()
            },
            MapConfig {
                max_load: f64::NAN,
                ..MapConfig::default()
            },
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(DerivationError::Config { .. })),
                "{:?} should be rejected",
                config
            );
        }
    }

    #[test]
    fn test_max_load_of_one_allowed() {
        let config = MapConfig {
            max_load: 1.0,
            ..MapConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_serialize_roundtrip_through_toml() {
        let config = MapConfig {
            initial_capacity: 31,
            max_load: 0.8,
            target_load: 0.4,
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(MapConfig::from_toml_str(&text).unwrap(), config);
    }
}
