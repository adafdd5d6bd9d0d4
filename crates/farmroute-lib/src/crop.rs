//! Cargo perishability classes and the crop-aware ETA optimizer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::PlannerConfig;
use crate::error::{fuzzy_matches, Error, Result};

/// Average truck speed before any crop adjustment.
pub const BASE_SPEED_KMH: f64 = 50.0;

/// Stop spacing for cargo that needs frequent checks.
const FREQUENT_STOP_INTERVAL_KM: f64 = 100.0;
/// Stop spacing for everything else.
const STANDARD_STOP_INTERVAL_KM: f64 = 150.0;

/// Perishability class of the cargo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CropType {
    HighlyPerishable,
    ModeratelyPerishable,
    LowPerishable,
    NonPerishable,
    Fragile,
    BulkHeavy,
}

impl CropType {
    pub const ALL: [CropType; 6] = [
        CropType::HighlyPerishable,
        CropType::ModeratelyPerishable,
        CropType::LowPerishable,
        CropType::NonPerishable,
        CropType::Fragile,
        CropType::BulkHeavy,
    ];

    /// Display name, also accepted by [`CropType::from_str`].
    pub fn label(self) -> &'static str {
        match self {
            CropType::HighlyPerishable => "Highly Perishable",
            CropType::ModeratelyPerishable => "Moderately Perishable",
            CropType::LowPerishable => "Low Perishable",
            CropType::NonPerishable => "Non-Perishable",
            CropType::Fragile => "Fragile",
            CropType::BulkHeavy => "Bulk / Heavy",
        }
    }

    /// Multiplier on [`BASE_SPEED_KMH`]. Below 1.0 models careful driving.
    pub fn speed_factor(self) -> f64 {
        match self {
            CropType::HighlyPerishable => 0.85,
            CropType::ModeratelyPerishable => 1.0,
            CropType::LowPerishable => 1.0,
            CropType::NonPerishable => 1.1,
            CropType::Fragile => 0.7,
            CropType::BulkHeavy => 0.8,
        }
    }

    /// Weight applied to time and distance penalties in suitability scoring.
    pub fn urgency(self) -> f64 {
        match self {
            CropType::HighlyPerishable => 1.5,
            CropType::ModeratelyPerishable => 1.2,
            CropType::LowPerishable => 1.0,
            CropType::NonPerishable => 0.8,
            CropType::Fragile => 1.3,
            CropType::BulkHeavy => 0.9,
        }
    }

    /// Example produce for each class, used in listings.
    pub fn examples(self) -> &'static [&'static str] {
        match self {
            CropType::HighlyPerishable => &["Leafy Greens", "Strawberries", "Mushrooms"],
            CropType::ModeratelyPerishable => &["Tomatoes", "Apples", "Potatoes"],
            CropType::LowPerishable => &["Onions", "Citrus", "Pumpkins"],
            CropType::NonPerishable => &["Grains", "Pulses", "Dried Fruits"],
            CropType::Fragile => &["Eggs", "Berries", "Cut Flowers"],
            CropType::BulkHeavy => &["Sugarcane", "Timber", "Fodder"],
        }
    }

    fn requires_frequent_stops(self) -> bool {
        matches!(self, CropType::HighlyPerishable | CropType::Fragile)
    }
}

impl fmt::Display for CropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CropType {
    type Err = Error;

    /// Case-insensitive; spaces, hyphens, underscores and slashes are ignored,
    /// so "Bulk / Heavy", "bulk-heavy" and "bulk_heavy" all parse.
    fn from_str(value: &str) -> Result<Self> {
        let wanted = normalize(value);
        CropType::ALL
            .into_iter()
            .find(|crop| normalize(crop.label()) == wanted)
            .ok_or_else(|| Error::UnknownCropType {
                name: value.to_string(),
                suggestions: fuzzy_matches(value, CropType::ALL.iter().map(|c| c.label()), 3),
            })
    }
}

impl Serialize for CropType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CropType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

fn normalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_' | '/'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Resolved scoring parameters for a cargo.
///
/// `crop_type` is `None` when the requested class was not recognised and the
/// neutral defaults are in use.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropProfile {
    pub crop_type: Option<CropType>,
    pub label: String,
    pub speed_factor: f64,
    pub urgency: f64,
}

impl CropProfile {
    pub fn from_type(crop_type: CropType) -> Self {
        Self {
            crop_type: Some(crop_type),
            label: crop_type.label().to_string(),
            speed_factor: crop_type.speed_factor(),
            urgency: crop_type.urgency(),
        }
    }

    /// Neutral profile (factor 1.0, urgency 1.0) carrying the given label.
    pub fn fallback(label: impl Into<String>) -> Self {
        Self {
            crop_type: None,
            label: label.into(),
            speed_factor: 1.0,
            urgency: 1.0,
        }
    }

    /// Parse `name`, degrading to [`CropProfile::fallback`] when it is unknown.
    pub fn resolve(name: &str) -> Self {
        match name.parse::<CropType>() {
            Ok(crop_type) => Self::from_type(crop_type),
            Err(err) => {
                tracing::warn!(crop = name, error = %err, "unknown crop type; using default factors");
                Self::fallback(name)
            }
        }
    }

    /// Parse `name`, failing with [`Error::UnknownCropType`] when it is unknown.
    pub fn strict(name: &str) -> Result<Self> {
        name.parse::<CropType>().map(Self::from_type)
    }

    fn requires_frequent_stops(&self) -> bool {
        self.crop_type
            .is_some_and(CropType::requires_frequent_stops)
    }
}

/// Delivery priority shown alongside the ETA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => f.write_str("high"),
            Priority::Medium => f.write_str("medium"),
        }
    }
}

/// Timing recommendation for one route and cargo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropOptimization {
    pub crop: String,
    /// Carried for display only; it does not affect the numbers.
    pub quantity_kg: f64,
    pub adjusted_speed_kmh: f64,
    pub eta_minutes: f64,
    pub recommended_stops: u32,
    pub priority: Priority,
}

/// ETA, rest stops and priority for `distance_km` with the named crop at the
/// default base speed.
///
/// Unknown crop names degrade to neutral factors and are logged.
///
/// # Examples
///
/// ```
/// use farmroute_lib::{optimize_for_crop, Priority};
///
/// let plan = optimize_for_crop(100.0, "Highly Perishable", 250.0);
/// assert_eq!(plan.adjusted_speed_kmh, 42.5);
/// assert_eq!(plan.recommended_stops, 1);
/// assert_eq!(plan.priority, Priority::High);
/// ```
pub fn optimize_for_crop(distance_km: f64, crop: &str, quantity_kg: f64) -> CropOptimization {
    optimize_with_base_speed(
        distance_km,
        &CropProfile::resolve(crop),
        quantity_kg,
        BASE_SPEED_KMH,
    )
}

/// Same as [`optimize_for_crop`] for an already resolved profile, using the
/// configured base speed.
pub fn optimize_for_profile(
    distance_km: f64,
    profile: &CropProfile,
    quantity_kg: f64,
    config: &PlannerConfig,
) -> CropOptimization {
    optimize_with_base_speed(distance_km, profile, quantity_kg, config.base_speed_kmh)
}

fn optimize_with_base_speed(
    distance_km: f64,
    profile: &CropProfile,
    quantity_kg: f64,
    base_speed_kmh: f64,
) -> CropOptimization {
    let adjusted_speed_kmh = base_speed_kmh * profile.speed_factor;
    let eta_minutes = distance_km / adjusted_speed_kmh * 60.0;

    let interval = if profile.requires_frequent_stops() {
        FREQUENT_STOP_INTERVAL_KM
    } else {
        STANDARD_STOP_INTERVAL_KM
    };
    let recommended_stops = (distance_km / interval).floor().max(0.0) as u32;

    let priority = if profile.crop_type == Some(CropType::HighlyPerishable) {
        Priority::High
    } else {
        Priority::Medium
    };

    CropOptimization {
        crop: profile.label.clone(),
        quantity_kg,
        adjusted_speed_kmh,
        eta_minutes,
        recommended_stops,
        priority,
    }
}
