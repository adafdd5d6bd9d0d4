//! Candidate routes as handed over by the routing collaborator, plus the
//! straight-line fallback and the geometry check on reported distances.

use serde::{Deserialize, Serialize};

use crate::config::PlannerConfig;
use crate::error::{Error, Result};
use crate::geo::{haversine_km, interpolate_straight_line, Coordinate};
use crate::graph::build_graph;
use crate::path::shortest_path;
use crate::weather::{SafetyAssessment, MAX_SAFETY_SCORE};

/// Provenance label for routes returned by a routing provider.
pub const PROVIDER_LABEL: &str = "provider-returned";
/// Provenance label for the synthesized straight-line route.
pub const FALLBACK_LABEL: &str = "synthesized-fallback";

fn default_source_label() -> String {
    PROVIDER_LABEL.to_string()
}

/// One proposed path between the farm and the market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRoute {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub coordinates: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(default = "default_source_label")]
    pub source_label: String,
    /// Attached by the weather pass; `None` until evaluated. Never read from
    /// provider input.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub safety: Option<SafetyAssessment>,
}

impl CandidateRoute {
    pub fn new(
        coordinates: Vec<Coordinate>,
        distance_km: f64,
        duration_min: f64,
        source_label: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            coordinates,
            distance_km,
            duration_min,
            source_label: source_label.into(),
            safety: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_safety(mut self, safety: SafetyAssessment) -> Self {
        self.safety = Some(safety);
        self
    }

    /// Check the geometry and the reported figures.
    pub fn validate(&self) -> Result<()> {
        if self.coordinates.len() < 2 {
            return Err(Error::TooFewWaypoints {
                count: self.coordinates.len(),
            });
        }
        for coordinate in &self.coordinates {
            coordinate.validate()?;
        }
        if !(self.distance_km.is_finite() && self.distance_km > 0.0) {
            return Err(Error::InvalidCandidate {
                message: format!("distance must be positive, got {}", self.distance_km),
            });
        }
        if !(self.duration_min.is_finite() && self.duration_min >= 0.0) {
            return Err(Error::InvalidCandidate {
                message: format!("duration must not be negative, got {}", self.duration_min),
            });
        }
        if let Some(safety) = self.safety {
            if !(0.0..=MAX_SAFETY_SCORE).contains(&safety.score) {
                return Err(Error::InvalidCandidate {
                    message: format!("safety score must be within [0, 100], got {}", safety.score),
                });
            }
        }
        Ok(())
    }

    pub fn start(&self) -> Option<Coordinate> {
        self.coordinates.first().copied()
    }

    pub fn end(&self) -> Option<Coordinate> {
        self.coordinates.last().copied()
    }

    /// Reported distance over reported duration; zero when the duration is zero.
    pub fn average_speed_kmh(&self) -> f64 {
        if self.duration_min > 0.0 {
            self.distance_km / (self.duration_min / 60.0)
        } else {
            0.0
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source_label == FALLBACK_LABEL
    }

    /// Name if present, otherwise the provenance label.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.source_label)
    }
}

/// Synthesize a straight-line route for when the provider returns nothing.
///
/// Coinciding endpoints would give a zero-length route, which no candidate may
/// have, so they are rejected with [`Error::IdenticalEndpoints`].
///
/// # Examples
///
/// ```
/// use farmroute_lib::{fallback_route, Coordinate, PlannerConfig};
///
/// let farm = Coordinate::new(30.0, 78.0).unwrap();
/// let market = Coordinate::new(30.5, 78.0).unwrap();
/// let route = fallback_route(farm, market, &PlannerConfig::default()).unwrap();
/// assert_eq!(route.coordinates.len(), 21);
/// assert_eq!(route.source_label, "synthesized-fallback");
/// ```
pub fn fallback_route(
    start: Coordinate,
    end: Coordinate,
    config: &PlannerConfig,
) -> Result<CandidateRoute> {
    start.validate()?;
    end.validate()?;

    let distance_km = haversine_km(start, end);
    if distance_km <= 0.0 {
        return Err(Error::IdenticalEndpoints {
            latitude: start.latitude,
            longitude: start.longitude,
        });
    }

    let duration_min = distance_km / config.fallback_speed_kmh * 60.0;
    let coordinates = interpolate_straight_line(start, end, config.fallback_points);
    Ok(CandidateRoute::new(
        coordinates,
        distance_km,
        duration_min,
        FALLBACK_LABEL,
    ))
}

/// Return `raw` unchanged when it has routes, else the fallback route alone.
pub fn normalize_candidates(
    raw: Vec<CandidateRoute>,
    start: Coordinate,
    end: Coordinate,
    config: &PlannerConfig,
) -> Result<Vec<CandidateRoute>> {
    if !raw.is_empty() {
        return Ok(raw);
    }
    tracing::info!("no candidate routes supplied; synthesizing straight-line fallback");
    Ok(vec![fallback_route(start, end, config)?])
}

/// How a reported distance compares with the route's own geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistancePlausibility {
    Plausible,
    /// Reported distance is shorter than the waypoints allow.
    ShorterThanGeometry,
    /// Reported distance is far longer than the waypoints suggest.
    ExcessiveDetour,
}

impl DistancePlausibility {
    pub fn is_plausible(self) -> bool {
        self == DistancePlausibility::Plausible
    }

    pub fn label(self) -> &'static str {
        match self {
            DistancePlausibility::Plausible => "plausible",
            DistancePlausibility::ShorterThanGeometry => "shorter than geometry",
            DistancePlausibility::ExcessiveDetour => "excessive detour",
        }
    }
}

/// Solver-validated figures for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateEvaluation {
    pub reported_distance_km: f64,
    pub validated_distance_km: f64,
    pub hop_count: usize,
    pub plausibility: DistancePlausibility,
}

/// Validate `route`, recompute its length through the graph solver and
/// classify the reported distance.
pub fn evaluate_candidate(
    route: &CandidateRoute,
    config: &PlannerConfig,
) -> Result<CandidateEvaluation> {
    route.validate()?;

    let graph = build_graph(&route.coordinates)?;
    let last = graph.node_count() - 1;
    let path = shortest_path(&graph, 0, last).require(0, last)?;

    let validated = path.total_cost;
    let reported = route.distance_km;
    let check = config.distance_check;
    let plausibility = if reported < validated * check.min_ratio {
        DistancePlausibility::ShorterThanGeometry
    } else if reported > validated * check.max_ratio {
        DistancePlausibility::ExcessiveDetour
    } else {
        DistancePlausibility::Plausible
    };

    if plausibility.is_plausible() {
        tracing::debug!(
            route = route.display_name(),
            reported,
            validated,
            "candidate distance checked"
        );
    } else {
        tracing::warn!(
            route = route.display_name(),
            reported,
            validated,
            verdict = plausibility.label(),
            "provider distance disagrees with route geometry"
        );
    }

    Ok(CandidateEvaluation {
        reported_distance_km: reported,
        validated_distance_km: validated,
        hop_count: path.hop_count(),
        plausibility,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::path_length_km;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn line(distance_km: f64) -> CandidateRoute {
        CandidateRoute::new(
            vec![coord(0.0, 0.0), coord(0.0, 0.5), coord(0.0, 1.0)],
            distance_km,
            60.0,
            PROVIDER_LABEL,
        )
    }

    #[test]
    fn validate_enforces_invariants() {
        line(111.0).validate().unwrap();

        assert!(matches!(
            line(0.0).validate(),
            Err(Error::InvalidCandidate { .. })
        ));

        let mut negative_duration = line(111.0);
        negative_duration.duration_min = -1.0;
        assert!(negative_duration.validate().is_err());

        let single = CandidateRoute::new(vec![coord(0.0, 0.0)], 1.0, 1.0, PROVIDER_LABEL);
        assert!(matches!(
            single.validate(),
            Err(Error::TooFewWaypoints { count: 1 })
        ));
    }

    #[test]
    fn validate_rejects_out_of_range_safety() {
        let scored = |score| {
            line(111.0).with_safety(SafetyAssessment {
                score,
                is_risky: false,
            })
        };
        scored(0.0).validate().unwrap();
        scored(100.0).validate().unwrap();
        for score in [250.0, -1.0, f64::NAN] {
            assert!(matches!(
                scored(score).validate(),
                Err(Error::InvalidCandidate { .. })
            ));
        }
    }

    #[test]
    fn average_speed_handles_zero_duration() {
        let mut route = line(100.0);
        assert_eq!(route.average_speed_kmh(), 100.0);
        route.duration_min = 0.0;
        assert_eq!(route.average_speed_kmh(), 0.0);
    }

    #[test]
    fn fallback_is_straight_line() {
        let start = coord(30.0, 78.0);
        let end = coord(30.2, 78.2);
        let route = fallback_route(start, end, &PlannerConfig::default()).unwrap();

        assert!(route.is_fallback());
        assert_eq!(route.coordinates.len(), 21);
        assert_eq!(route.start(), Some(start));
        assert_eq!(route.end(), Some(end));
        assert!((route.distance_km - haversine_km(start, end)).abs() < 1e-9);
        assert!((route.duration_min - route.distance_km / 50.0 * 60.0).abs() < 1e-9);
        route.validate().unwrap();
    }

    #[test]
    fn fallback_rejects_identical_endpoints() {
        let point = coord(30.0, 78.0);
        assert!(matches!(
            fallback_route(point, point, &PlannerConfig::default()),
            Err(Error::IdenticalEndpoints { .. })
        ));
    }

    #[test]
    fn normalize_keeps_provider_routes() {
        let start = coord(0.0, 0.0);
        let end = coord(0.0, 1.0);
        let config = PlannerConfig::default();

        let kept = normalize_candidates(vec![line(111.0)], start, end, &config).unwrap();
        assert_eq!(kept, vec![line(111.0)]);

        let synthesized = normalize_candidates(Vec::new(), start, end, &config).unwrap();
        assert_eq!(synthesized.len(), 1);
        assert!(synthesized[0].is_fallback());
    }

    #[test]
    fn plausibility_bounds() {
        let config = PlannerConfig::default();
        let geometric = path_length_km(&line(1.0).coordinates);

        let ok = evaluate_candidate(&line(geometric * 1.3), &config).unwrap();
        assert_eq!(ok.plausibility, DistancePlausibility::Plausible);
        assert_eq!(ok.hop_count, 2);
        assert!((ok.validated_distance_km - geometric).abs() < 1e-9);

        let short = evaluate_candidate(&line(geometric * 0.5), &config).unwrap();
        assert_eq!(short.plausibility, DistancePlausibility::ShorterThanGeometry);

        let long = evaluate_candidate(&line(geometric * 4.0), &config).unwrap();
        assert_eq!(long.plausibility, DistancePlausibility::ExcessiveDetour);
    }

    #[test]
    fn provider_safety_is_ignored() {
        let route: CandidateRoute = serde_json::from_str(
            r#"{"coordinates": [[0.0, 0.0], [0.0, 1.0]], "distance_km": 112.0,
                "duration_min": 90.0, "safety": {"score": 250.0, "is_risky": false}}"#,
        )
        .unwrap();
        assert_eq!(route.safety, None);
    }

    #[test]
    fn deserializes_with_default_label() {
        let route: CandidateRoute = serde_json::from_str(
            r#"{"coordinates": [[0.0, 0.0], [0.0, 1.0]], "distance_km": 112.0, "duration_min": 90.0}"#,
        )
        .unwrap();
        assert_eq!(route.source_label, PROVIDER_LABEL);
        assert_eq!(route.safety, None);
        assert_eq!(route.display_name(), PROVIDER_LABEL);
    }
}
