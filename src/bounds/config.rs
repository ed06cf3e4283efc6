//! Bounds builder configuration

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Bounds builder configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundsBuilderConfig {
    /// Cell budget passed to the planar (2d) coverer (default: 16)
    #[serde(default = "default_max_covering_cells_2d")]
    pub max_covering_cells_2d: usize,

    /// Log a structured event when translation fails (default: true)
    #[serde(default = "default_log_translation_failures")]
    pub log_translation_failures: bool,

    /// Log a trace event when a wildcard index loosens tightness (default: false)
    #[serde(default)]
    pub log_wildcard_adjustments: bool,
}

fn default_max_covering_cells_2d() -> usize {
    16
}

fn default_log_translation_failures() -> bool {
    true
}

impl Default for BoundsBuilderConfig {
    fn default() -> Self {
        Self {
            max_covering_cells_2d: default_max_covering_cells_2d(),
            log_translation_failures: default_log_translation_failures(),
            log_wildcard_adjustments: false,
        }
    }
}

impl BoundsBuilderConfig {
    /// Create a config with the given planar cell budget
    pub fn with_max_covering_cells_2d(max_covering_cells_2d: usize) -> Self {
        Self {
            max_covering_cells_2d,
            ..Default::default()
        }
    }

    /// Config that never logs; for callers that report errors themselves
    pub fn quiet() -> Self {
        Self {
            log_translation_failures: false,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON config; missing keys take their defaults
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_covering_cells_2d == 0 {
            return Err(ConfigError::Invalid(
                "max_covering_cells_2d must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
