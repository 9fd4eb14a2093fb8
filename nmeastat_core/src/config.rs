//! Configuration for the statistics engine. Everything has a sensible
//! default, and a JSON file only needs to mention the values it changes.

use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};

use crate::{error::StatsError, formatting::check_vanity_factor};

/// One mile, which is the split distance used for commutes.
pub const MILE_METRES: f64 = 1609.34;

/// A quarter of a mile, the split distance used for workouts.
pub const QUARTER_MILE_METRES: f64 = 402.336;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Multiplier applied to every pace before it is formatted. 1.0 leaves
    /// paces alone. It only affects the displayed strings.
    pub vanity_factor: f64,

    /// Split distance used when a track is classified as a commute.
    pub commute_split_metres: f64,

    /// Split distance used for everything else (jogs, walks).
    pub workout_split_metres: f64,

    pub commute: CommuteConfig,
}

/// Controls `is_commute_track`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommuteConfig {
    /// Tracks with a lower average speed are never commutes.
    pub min_commute_mph: f64,

    /// How far (in degrees) a route anchor may lie outside a track's
    /// bounding box and still count as inside it.
    pub anchor_margin_degrees: f64,

    /// The known commute routes. If empty, only the speed is considered.
    pub routes: Vec<ReferenceRoute>,
}

/// A named commute route, identified by points it is known to pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRoute {
    pub name: String,
    pub anchors: Vec<Anchor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub lat: f64,
    pub long: f64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            vanity_factor: 1.0,
            commute_split_metres: MILE_METRES,
            workout_split_metres: QUARTER_MILE_METRES,
            commute: CommuteConfig::default(),
        }
    }
}

impl Default for CommuteConfig {
    fn default() -> Self {
        Self {
            min_commute_mph: 10.0,
            anchor_margin_degrees: 0.005,
            routes: vec![
                ReferenceRoute::new(
                    "Beltway",
                    &[(38.81345, -77.07626), (38.817804860344829, -77.095808967241382)],
                ),
                ReferenceRoute::new(
                    "Quaker Lane",
                    &[(38.81875, -77.06596), (38.813570009345796, -77.058113224299063)],
                ),
                ReferenceRoute::new(
                    "Through Town",
                    &[(38.847879744827587, -77.047123420689658)],
                ),
            ],
        }
    }
}

impl ReferenceRoute {
    /// Makes a route from (lat, long) pairs.
    pub fn new<S: Into<String>>(name: S, anchors: &[(f64, f64)]) -> Self {
        Self {
            name: name.into(),
            anchors: anchors
                .iter()
                .map(|&(lat, long)| Anchor { lat, long })
                .collect(),
        }
    }
}

impl StatsConfig {
    /// Reads the configuration from a JSON file. Missing values take
    /// their defaults.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Reading configuration from {:?}", path);

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        Self::from_json(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))
    }

    /// Parses and validates the configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every number is usable. The split distances and the
    /// minimum commute speed must be positive, the anchor margin must not be
    /// negative, and nothing may be NaN or infinite.
    pub fn validate(&self) -> crate::error::Result<()> {
        check_vanity_factor(self.vanity_factor)?;
        check_positive("commute_split_metres", self.commute_split_metres)?;
        check_positive("workout_split_metres", self.workout_split_metres)?;
        check_positive("commute.min_commute_mph", self.commute.min_commute_mph)?;

        let margin = self.commute.anchor_margin_degrees;
        if !margin.is_finite() || margin < 0.0 {
            return Err(StatsError::precondition(format!(
                "commute.anchor_margin_degrees must be zero or more, got {margin}"
            )));
        }

        Ok(())
    }
}

fn check_positive(name: &str, value: f64) -> crate::error::Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(StatsError::precondition(format!(
            "{name} must be a positive number, got {value}"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StatsConfig::default();
        assert_eq!(config.vanity_factor, 1.0);
        assert_eq!(config.commute_split_metres, 1609.34);
        assert_eq!(config.workout_split_metres, 402.336);
        assert_eq!(config.commute.min_commute_mph, 10.0);
        assert_eq!(config.commute.routes.len(), 3);
        assert_eq!(config.commute.routes[2].anchors.len(), 1);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config =
            StatsConfig::from_json(r#"{ "vanity_factor": 0.9, "commute": { "routes": [] } }"#)
                .unwrap();
        assert_eq!(config.vanity_factor, 0.9);
        assert_eq!(config.workout_split_metres, QUARTER_MILE_METRES);
        assert_eq!(config.commute.min_commute_mph, 10.0);
        assert!(config.commute.routes.is_empty());
    }

    #[test]
    fn test_routes_from_json() {
        let json = r#"{
            "commute": {
                "routes": [
                    { "name": "River", "anchors": [ { "lat": 51.5, "long": -0.1 } ] }
                ]
            }
        }"#;

        let config = StatsConfig::from_json(json).unwrap();
        assert_eq!(
            config.commute.routes,
            vec![ReferenceRoute::new("River", &[(51.5, -0.1)])]
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(StatsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_unusable_numbers_are_rejected() {
        let bad_configs = [
            StatsConfig { vanity_factor: -0.15, ..StatsConfig::default() },
            StatsConfig { vanity_factor: f64::NAN, ..StatsConfig::default() },
            StatsConfig { vanity_factor: 0.0, ..StatsConfig::default() },
            StatsConfig { commute_split_metres: 0.0, ..StatsConfig::default() },
            StatsConfig { workout_split_metres: -402.336, ..StatsConfig::default() },
            StatsConfig { workout_split_metres: f64::INFINITY, ..StatsConfig::default() },
            StatsConfig {
                commute: CommuteConfig { min_commute_mph: -1.0, ..CommuteConfig::default() },
                ..StatsConfig::default()
            },
            StatsConfig {
                commute: CommuteConfig { anchor_margin_degrees: -0.005, ..CommuteConfig::default() },
                ..StatsConfig::default()
            },
            StatsConfig {
                commute: CommuteConfig { anchor_margin_degrees: f64::NAN, ..CommuteConfig::default() },
                ..StatsConfig::default()
            },
        ];

        for config in &bad_configs {
            assert!(
                matches!(config.validate(), Err(StatsError::Precondition(_))),
                "{config:?}"
            );
        }

        let zero_margin = StatsConfig {
            commute: CommuteConfig { anchor_margin_degrees: 0.0, ..CommuteConfig::default() },
            ..StatsConfig::default()
        };
        assert!(zero_margin.validate().is_ok());
    }

    #[test]
    fn test_negative_vanity_factor_in_json_is_an_error() {
        assert!(StatsConfig::from_json(r#"{ "vanity_factor": -1.0 }"#).is_err());
        assert!(StatsConfig::from_json(r#"{ "workout_split_metres": 0 }"#).is_err());
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(StatsConfig::from_json("{ vanity_factor: }").is_err());
    }
}
