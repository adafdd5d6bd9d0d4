use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable consulted by [`PlannerConfig::load`] when no explicit
/// path is given.
pub const CONFIG_ENV_VAR: &str = "FARMROUTE_CONFIG";

/// Bounds on the ratio between a provider-reported distance and the length
/// recomputed from the route geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistanceCheck {
    pub min_ratio: f64,
    pub max_ratio: f64,
}

impl Default for DistanceCheck {
    fn default() -> Self {
        Self {
            min_ratio: 0.9,
            max_ratio: 3.0,
        }
    }
}

/// Tunables for the planning pipeline.
///
/// Every field has a default, so a configuration file only needs to name the
/// values it changes:
///
/// ```
/// use farmroute_lib::PlannerConfig;
///
/// let config: PlannerConfig = serde_json::from_str(r#"{"base_speed_kmh": 40.0}"#).unwrap();
/// assert_eq!(config.base_speed_kmh, 40.0);
/// assert_eq!(config.fallback_points, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Truck speed before the crop speed factor is applied.
    pub base_speed_kmh: f64,
    /// Interpolation segments of the synthesized straight-line route.
    pub fallback_points: usize,
    /// Speed used to derive the synthesized route's duration.
    pub fallback_speed_kmh: f64,
    pub distance_check: DistanceCheck,
    /// Search radius of [`crate::weather::StaticWeatherSource`].
    pub weather_match_radius_km: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_speed_kmh: 50.0,
            fallback_points: 20,
            fallback_speed_kmh: 50.0,
            distance_check: DistanceCheck::default(),
            weather_match_radius_km: 25.0,
        }
    }
}

impl PlannerConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("base_speed_kmh", self.base_speed_kmh)?;
        ensure_positive("fallback_speed_kmh", self.fallback_speed_kmh)?;
        ensure_positive("weather_match_radius_km", self.weather_match_radius_km)?;
        ensure_positive("distance_check.min_ratio", self.distance_check.min_ratio)?;
        ensure_positive("distance_check.max_ratio", self.distance_check.max_ratio)?;

        if self.fallback_points == 0 {
            return Err(Error::InvalidConfig {
                message: "fallback_points must be at least 1".to_string(),
            });
        }
        if self.distance_check.min_ratio > self.distance_check.max_ratio {
            return Err(Error::InvalidConfig {
                message: format!(
                    "distance_check.min_ratio ({}) exceeds max_ratio ({})",
                    self.distance_check.min_ratio, self.distance_check.max_ratio
                ),
            });
        }
        Ok(())
    }

    /// Read and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded planner configuration");
        Ok(config)
    }

    /// Resolve configuration from an explicit path, then
    /// [`CONFIG_ENV_VAR`], then the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_path(path);
        }

        if let Some(env_path) = env::var_os(CONFIG_ENV_VAR) {
            let resolved = PathBuf::from(env_path);
            return Self::from_path(&resolved);
        }

        Ok(Self::default())
    }
}

fn ensure_positive(field: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidConfig {
            message: format!("{field} must be a positive finite number, got {value}"),
        })
    }
}
