//! Container configuration.
//!
//! Sizing knobs shared by the containers that have any: hash table
//! initial capacity and growth threshold, and the bound of the circular
//! queue. All fields have defaults, so a partial JSON document is valid.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default hash table bucket count.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
/// Default hash table load factor threshold.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;
/// Default circular queue bound.
pub const DEFAULT_CIRCULAR_CAPACITY: usize = 10;

/// Sizing configuration for the containers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionsConfig {
    /// Initial hash table bucket count (rounded up to a power of two).
    pub initial_capacity: usize,
    /// Hash table grows when `size / capacity` would exceed this.
    pub load_factor_threshold: f64,
    /// Number of items a circular queue retains.
    pub circular_capacity: usize,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            load_factor_threshold: DEFAULT_LOAD_FACTOR,
            circular_capacity: DEFAULT_CIRCULAR_CAPACITY,
        }
    }
}

impl CollectionsConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hash table initial capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    /// Sets the hash table load factor threshold.
    pub fn with_load_factor(mut self, threshold: f64) -> Self {
        self.load_factor_threshold = threshold;
        self
    }

    /// Sets the circular queue capacity.
    pub fn with_circular_capacity(mut self, capacity: usize) -> Self {
        self.circular_capacity = capacity;
        self
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every field is in range.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.load_factor_threshold > 0.0 && self.load_factor_threshold <= 1.0) {
            return Err(ConfigError::Range {
                field: "load_factor_threshold",
                value: self.load_factor_threshold.to_string(),
                hint: "must be in (0.0, 1.0]",
            });
        }
        if self.circular_capacity == 0 {
            return Err(ConfigError::Range {
                field: "circular_capacity",
                value: "0".to_string(),
                hint: "a circular queue must hold at least one item",
            });
        }
        Ok(())
    }

    /// Bucket count actually used: the next power of two, at least 1.
    pub fn bucket_count(&self) -> usize {
        self.initial_capacity.max(1).next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = CollectionsConfig::default();
        assert_eq!(c.initial_capacity, 16);
        assert!((c.load_factor_threshold - 0.75).abs() < 1e-10);
        assert_eq!(c.circular_capacity, 10);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = CollectionsConfig::from_json_str(r#"{"initial_capacity": 4}"#).unwrap();
        assert_eq!(c.initial_capacity, 4);
        assert_eq!(c.circular_capacity, 10);
    }

    #[test]
    fn test_out_of_range_load_factor() {
        let err = CollectionsConfig::from_json_str(r#"{"load_factor_threshold": 1.5}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Range {
                field: "load_factor_threshold",
                ..
            }
        ));

        assert!(CollectionsConfig::new().with_load_factor(0.0).validate().is_err());
    }

    #[test]
    fn test_zero_circular_capacity() {
        assert!(CollectionsConfig::new()
            .with_circular_capacity(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = CollectionsConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_bucket_count_rounding() {
        assert_eq!(CollectionsConfig::new().with_initial_capacity(0).bucket_count(), 1);
        assert_eq!(CollectionsConfig::new().with_initial_capacity(10).bucket_count(), 16);
        assert_eq!(CollectionsConfig::new().with_initial_capacity(32).bucket_count(), 32);
    }
}
