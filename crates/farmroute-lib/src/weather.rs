//! Weather safety scoring and the weather collaborator boundary.
//!
//! Two independent signals are derived from a [`WeatherObservation`]:
//!
//! - a bounded numeric safety score in `[0, 100]` built from bracketed
//!   deductions for precipitation, wind and temperature, and
//! - a boolean "risky" flag driven by WMO condition codes and hard
//!   precipitation/wind limits, used to trigger rerouting.
//!
//! The thresholds of the two signals intentionally differ (precipitation above
//! 5 mm flags a route as risky while only costing 25 points), so neither is
//! computed from the other.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geo::{haversine_km, midpoint, Coordinate};

/// Score assigned to perfect conditions before deductions.
pub const MAX_SAFETY_SCORE: f64 = 100.0;

/// A single weather reading at one place and time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub temperature_c: f64,
    pub precipitation_mm: f64,
    /// Rain component of precipitation, when the provider reports it separately.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain_mm: Option<f64>,
    pub wind_speed_kmh: f64,
    pub weather_code: i32,
}

impl Default for WeatherObservation {
    /// Safe fallback used whenever the weather collaborator cannot answer.
    fn default() -> Self {
        Self {
            temperature_c: 25.0,
            precipitation_mm: 0.0,
            rain_mm: Some(0.0),
            wind_speed_kmh: 10.0,
            weather_code: 0,
        }
    }
}

/// Numeric score plus the independent risk flag for one observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyAssessment {
    pub score: f64,
    pub is_risky: bool,
}

impl SafetyAssessment {
    pub fn band(&self) -> SafetyBand {
        SafetyBand::from_score(self.score)
    }
}

/// Display classification of a safety score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyBand {
    Safe,
    Caution,
    Unsafe,
}

impl SafetyBand {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SafetyBand::Safe
        } else if score >= 60.0 {
            SafetyBand::Caution
        } else {
            SafetyBand::Unsafe
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SafetyBand::Safe => "safe",
            SafetyBand::Caution => "caution",
            SafetyBand::Unsafe => "unsafe",
        }
    }
}

/// Score and classify an observation.
///
/// # Examples
///
/// ```
/// use farmroute_lib::weather::{score_weather_safety, WeatherObservation};
///
/// let drizzle = WeatherObservation {
///     temperature_c: 22.0,
///     precipitation_mm: 1.0,
///     rain_mm: None,
///     wind_speed_kmh: 5.0,
///     weather_code: 61,
/// };
/// let assessment = score_weather_safety(&drizzle);
/// assert_eq!(assessment.score, 100.0);
/// assert!(assessment.is_risky);
/// ```
pub fn score_weather_safety(observation: &WeatherObservation) -> SafetyAssessment {
    SafetyAssessment {
        score: safety_score(observation),
        is_risky: is_risky(observation),
    }
}

/// Bracketed deductions from [`MAX_SAFETY_SCORE`], clamped to `[0, 100]`.
///
/// Each category contributes only its most severe matching bracket.
pub fn safety_score(observation: &WeatherObservation) -> f64 {
    let deductions = precipitation_deduction(observation.precipitation_mm)
        + wind_deduction(observation.wind_speed_kmh)
        + temperature_deduction(observation.temperature_c);
    (MAX_SAFETY_SCORE - deductions).clamp(0.0, MAX_SAFETY_SCORE)
}

fn precipitation_deduction(precipitation_mm: f64) -> f64 {
    if precipitation_mm > 10.0 {
        40.0
    } else if precipitation_mm > 5.0 {
        25.0
    } else if precipitation_mm > 2.0 {
        10.0
    } else {
        0.0
    }
}

fn wind_deduction(wind_speed_kmh: f64) -> f64 {
    if wind_speed_kmh > 35.0 {
        30.0
    } else if wind_speed_kmh > 25.0 {
        20.0
    } else if wind_speed_kmh > 15.0 {
        10.0
    } else {
        0.0
    }
}

fn temperature_deduction(temperature_c: f64) -> f64 {
    if temperature_c < 0.0 || temperature_c > 40.0 {
        30.0
    } else if temperature_c < 5.0 || temperature_c > 35.0 {
        20.0
    } else if temperature_c < 10.0 || temperature_c > 30.0 {
        10.0
    } else {
        0.0
    }
}

/// Whether conditions warrant looking for another route.
///
/// Fog (45-48), drizzle/rain (51-67), snow (71-86) and thunderstorms (95+)
/// are risky on their own, as is precipitation or rain above 5 mm and wind
/// above 40 km/h.
pub fn is_risky(observation: &WeatherObservation) -> bool {
    let code = observation.weather_code;
    let hazardous_code = (45..=48).contains(&code)
        || (51..=67).contains(&code)
        || (71..=86).contains(&code)
        || code >= 95;

    hazardous_code
        || observation.precipitation_mm > 5.0
        || observation.rain_mm.is_some_and(|rain| rain > 5.0)
        || observation.wind_speed_kmh > 40.0
}

/// Human-readable hazards for advisory output.
pub fn risk_factors(observation: &WeatherObservation) -> Vec<&'static str> {
    let mut factors = Vec::new();
    if observation.precipitation_mm > 5.0 {
        factors.push("Heavy precipitation");
    }
    if observation.wind_speed_kmh > 25.0 {
        factors.push("Strong winds");
    }
    if observation.temperature_c < 5.0 || observation.temperature_c > 35.0 {
        factors.push("Extreme temperature");
    }
    factors
}

/// WMO weather code label.
pub fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Foggy",
        48 => "Dense fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        61 => "Slight rain",
        63 => "Moderate rain",
        65 => "Heavy rain",
        71 => "Slight snow",
        73 => "Moderate snow",
        75 => "Heavy snow",
        95 => "Thunderstorm",
        96 => "Thunderstorm with hail",
        99 => "Heavy thunderstorm",
        _ => "Unknown",
    }
}

/// Source of weather observations keyed by coordinate.
///
/// Implementations wrap forecast providers; the core only ever calls
/// [`observe_or_default`], so failures degrade to the safe default.
pub trait WeatherSource {
    fn observe(&self, at: Coordinate) -> Result<WeatherObservation>;
}

/// Ask `source` for weather at `at`, falling back to
/// [`WeatherObservation::default`] when it fails.
pub fn observe_or_default(source: &dyn WeatherSource, at: Coordinate) -> WeatherObservation {
    match source.observe(at) {
        Ok(observation) => observation,
        Err(err) => {
            tracing::warn!(
                latitude = at.latitude,
                longitude = at.longitude,
                error = %err,
                "weather unavailable; assuming default conditions"
            );
            WeatherObservation::default()
        }
    }
}

/// Observation pinned to a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherStation {
    pub location: Coordinate,
    pub observation: WeatherObservation,
}

/// In-memory weather source answering with the nearest station in range.
#[derive(Debug, Clone, Default)]
pub struct StaticWeatherSource {
    stations: Vec<WeatherStation>,
    max_distance_km: f64,
}

impl StaticWeatherSource {
    pub fn new(stations: Vec<WeatherStation>, max_distance_km: f64) -> Self {
        Self {
            stations,
            max_distance_km,
        }
    }

    pub fn stations(&self) -> &[WeatherStation] {
        &self.stations
    }
}

impl WeatherSource for StaticWeatherSource {
    fn observe(&self, at: Coordinate) -> Result<WeatherObservation> {
        self.stations
            .iter()
            .map(|station| (haversine_km(station.location, at), station))
            .filter(|(distance, _)| *distance <= self.max_distance_km)
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, station)| station.observation)
            .ok_or_else(|| {
                Error::upstream(
                    "weather",
                    format!(
                        "no station within {:.1} km of ({:.4}, {:.4})",
                        self.max_distance_km, at.latitude, at.longitude
                    ),
                )
            })
    }
}

/// Weather probed at the start, middle and end of a journey.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteWeatherAssessment {
    pub is_risky: bool,
    pub start: WeatherObservation,
    pub mid: WeatherObservation,
    pub end: WeatherObservation,
    pub worst: WeatherObservation,
    pub recommendation: String,
}

/// Probe start, end and midpoint and summarise the journey's weather.
///
/// The worst observation is the midpoint if it is risky, otherwise the end if
/// it is risky, otherwise the start.
pub fn evaluate_route_weather(
    source: &dyn WeatherSource,
    start: Coordinate,
    end: Coordinate,
) -> RouteWeatherAssessment {
    let start_weather = observe_or_default(source, start);
    let end_weather = observe_or_default(source, end);
    let mid_weather = observe_or_default(source, midpoint(start, end));

    let start_risky = is_risky(&start_weather);
    let end_risky = is_risky(&end_weather);
    let mid_risky = is_risky(&mid_weather);
    let risky = start_risky || end_risky || mid_risky;

    let worst = if mid_risky {
        mid_weather
    } else if end_risky {
        end_weather
    } else {
        start_weather
    };

    RouteWeatherAssessment {
        is_risky: risky,
        start: start_weather,
        mid: mid_weather,
        end: end_weather,
        worst,
        recommendation: recommendation(risky, &worst),
    }
}

fn recommendation(risky: bool, worst: &WeatherObservation) -> String {
    if risky {
        format!(
            "Weather Alert: {} detected. Alternative route recommended for safety.",
            weather_description(worst.weather_code)
        )
    } else {
        "Current route is optimal based on weather conditions.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calm() -> WeatherObservation {
        WeatherObservation {
            temperature_c: 20.0,
            precipitation_mm: 0.0,
            rain_mm: None,
            wind_speed_kmh: 5.0,
            weather_code: 1,
        }
    }

    #[test]
    fn perfect_conditions_score_full_marks() {
        let assessment = score_weather_safety(&calm());
        assert_eq!(assessment.score, 100.0);
        assert!(!assessment.is_risky);
        assert_eq!(assessment.band(), SafetyBand::Safe);
    }

    #[test]
    fn brackets_are_exclusive_per_category() {
        let mut obs = calm();
        obs.precipitation_mm = 12.0;
        assert_eq!(safety_score(&obs), 60.0);
        obs.precipitation_mm = 6.0;
        assert_eq!(safety_score(&obs), 75.0);
        obs.precipitation_mm = 5.0;
        assert_eq!(safety_score(&obs), 90.0);
        obs.precipitation_mm = 2.0;
        assert_eq!(safety_score(&obs), 100.0);
    }

    #[test]
    fn worst_case_bottoms_out_at_zero() {
        let obs = WeatherObservation {
            temperature_c: -5.0,
            precipitation_mm: 30.0,
            rain_mm: Some(30.0),
            wind_speed_kmh: 80.0,
            weather_code: 99,
        };
        let assessment = score_weather_safety(&obs);
        assert_eq!(assessment.score, 0.0);
        assert!(assessment.is_risky);
        assert_eq!(assessment.band(), SafetyBand::Unsafe);
    }

    #[test]
    fn temperature_brackets_cover_both_sides() {
        let mut obs = calm();
        for (temp, expected) in [
            (-1.0, 70.0),
            (4.0, 80.0),
            (9.0, 90.0),
            (10.0, 100.0),
            (30.0, 100.0),
            (31.0, 90.0),
            (36.0, 80.0),
            (41.0, 70.0),
        ] {
            obs.temperature_c = temp;
            assert_eq!(safety_score(&obs), expected, "temperature {temp}");
        }
    }

    #[test]
    fn risk_flag_is_independent_of_score() {
        let mut obs = calm();
        obs.weather_code = 45;
        assert!(is_risky(&obs));
        assert_eq!(safety_score(&obs), 100.0);

        let mut obs = calm();
        obs.wind_speed_kmh = 38.0;
        assert!(!is_risky(&obs));
        assert_eq!(safety_score(&obs), 70.0);

        let mut obs = calm();
        obs.rain_mm = Some(6.0);
        assert!(is_risky(&obs));

        let mut obs = calm();
        obs.wind_speed_kmh = 41.0;
        assert!(is_risky(&obs));
    }

    #[test]
    fn code_ranges() {
        let mut obs = calm();
        for (code, risky) in [
            (3, false),
            (44, false),
            (48, true),
            (50, false),
            (67, true),
            (70, false),
            (86, true),
            (94, false),
            (95, true),
        ] {
            obs.weather_code = code;
            assert_eq!(is_risky(&obs), risky, "code {code}");
        }
    }

    #[test]
    fn risk_factor_labels() {
        let obs = WeatherObservation {
            temperature_c: 38.0,
            precipitation_mm: 7.0,
            rain_mm: None,
            wind_speed_kmh: 30.0,
            weather_code: 0,
        };
        assert_eq!(
            risk_factors(&obs),
            vec!["Heavy precipitation", "Strong winds", "Extreme temperature"]
        );
        assert!(risk_factors(&calm()).is_empty());
    }

    #[test]
    fn descriptions() {
        assert_eq!(weather_description(61), "Slight rain");
        assert_eq!(weather_description(42), "Unknown");
    }

    #[test]
    fn bands_cut_at_eighty_and_sixty() {
        assert_eq!(SafetyBand::from_score(80.0), SafetyBand::Safe);
        assert_eq!(SafetyBand::from_score(79.9), SafetyBand::Caution);
        assert_eq!(SafetyBand::from_score(60.0), SafetyBand::Caution);
        assert_eq!(SafetyBand::from_score(59.0), SafetyBand::Unsafe);
    }
}
