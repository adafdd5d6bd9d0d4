use serde::{Deserialize, Serialize};

use crate::candidate::{evaluate_candidate, normalize_candidates, CandidateEvaluation, CandidateRoute};
use crate::config::PlannerConfig;
use crate::crop::{optimize_for_profile, CropOptimization, CropProfile};
use crate::error::Result;
use crate::geo::Coordinate;
use crate::ranking::{
    rank_indexed, score_start_weather, suitability_score, RankMode, RankedRoute, Suitability,
    SuitabilityGrade,
};
use crate::weather::{evaluate_route_weather, RouteWeatherAssessment, WeatherSource};

/// Everything needed to plan one farm-to-market delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: Coordinate,
    pub end: Coordinate,
    /// Provider routes, primary first. Empty means "synthesize a fallback".
    #[serde(default)]
    pub candidates: Vec<CandidateRoute>,
    pub crop: String,
    #[serde(default)]
    pub quantity_kg: f64,
    #[serde(skip)]
    pub mode: RankMode,
}

impl RouteRequest {
    pub fn new(start: Coordinate, end: Coordinate, crop: impl Into<String>) -> Self {
        Self {
            start,
            end,
            candidates: Vec::new(),
            crop: crop.into(),
            quantity_kg: 0.0,
            mode: RankMode::Default,
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<CandidateRoute>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_quantity(mut self, quantity_kg: f64) -> Self {
        self.quantity_kg = quantity_kg;
        self
    }

    pub fn with_mode(mut self, mode: RankMode) -> Self {
        self.mode = mode;
        self
    }
}

/// A candidate that failed validation and was left out of the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedCandidate {
    pub index: usize,
    pub reason: String,
}

/// Solver check result for a surviving candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedCandidate {
    pub index: usize,
    pub evaluation: CandidateEvaluation,
}

/// Output of [`plan_routes`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub ranked: Vec<RankedRoute>,
    pub evaluations: Vec<EvaluatedCandidate>,
    pub rejected: Vec<RejectedCandidate>,
    /// In ranked order; `index` is the candidate's original index.
    pub suitability: Vec<Suitability>,
    pub profile: CropProfile,
    /// Timing for the top-ranked route.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<CropOptimization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<RouteWeatherAssessment>,
}

impl RoutePlan {
    /// Top-ranked route, or `None` when no route is available.
    pub fn best(&self) -> Option<&RankedRoute> {
        self.ranked.first()
    }

    pub fn evaluation_for(&self, index: usize) -> Option<&CandidateEvaluation> {
        self.evaluations
            .iter()
            .find(|entry| entry.index == index)
            .map(|entry| &entry.evaluation)
    }

    pub fn suitability_for(&self, index: usize) -> Option<&Suitability> {
        self.suitability.iter().find(|entry| entry.index == index)
    }
}

/// Run the full pipeline: normalise, validate, score weather, rank, and
/// attach suitability and crop timing.
///
/// Invalid candidates are recorded in [`RoutePlan::rejected`] and skipped.
/// Only invalid endpoints fail the whole call.
pub fn plan_routes(
    request: &RouteRequest,
    weather: Option<&dyn WeatherSource>,
    config: &PlannerConfig,
) -> Result<RoutePlan> {
    request.start.validate()?;
    request.end.validate()?;

    let candidates = normalize_candidates(
        request.candidates.clone(),
        request.start,
        request.end,
        config,
    )?;

    let mut survivors = Vec::with_capacity(candidates.len());
    let mut evaluations = Vec::with_capacity(candidates.len());
    let mut rejected = Vec::new();
    for (index, route) in candidates.into_iter().enumerate() {
        match evaluate_candidate(&route, config) {
            Ok(evaluation) => {
                evaluations.push(EvaluatedCandidate { index, evaluation });
                survivors.push((index, route));
            }
            Err(err) => {
                tracing::warn!(index, error = %err, "discarding invalid candidate route");
                rejected.push(RejectedCandidate {
                    index,
                    reason: err.to_string(),
                });
            }
        }
    }

    let weather_summary = match (weather, request.mode) {
        (Some(source), RankMode::WeatherAware) => {
            for (_, route) in &mut survivors {
                score_start_weather(route, source);
            }
            Some(evaluate_route_weather(source, request.start, request.end))
        }
        (Some(source), RankMode::Default) => {
            Some(evaluate_route_weather(source, request.start, request.end))
        }
        (None, _) => None,
    };

    let ranked = rank_indexed(survivors, request.mode);
    let profile = CropProfile::resolve(&request.crop);

    let suitability = ranked
        .iter()
        .map(|entry| {
            let score = suitability_score(
                profile.urgency,
                entry.route.duration_min,
                entry.route.distance_km,
            );
            Suitability {
                index: entry.original_index,
                score,
                grade: SuitabilityGrade::from_score(score),
            }
        })
        .collect();

    let optimization = ranked.first().map(|best| {
        optimize_for_profile(best.route.distance_km, &profile, request.quantity_kg, config)
    });

    match ranked.first() {
        Some(best) => tracing::info!(
            candidates = ranked.len() + rejected.len(),
            rejected = rejected.len(),
            best = best.route.display_name(),
            mode = %request.mode,
            "route plan ready"
        ),
        None => tracing::warn!(rejected = rejected.len(), "no route available"),
    }

    Ok(RoutePlan {
        ranked,
        evaluations,
        rejected,
        suitability,
        profile,
        optimization,
        weather: weather_summary,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn empty_candidates_use_fallback() {
        let request = RouteRequest::new(coord(30.0, 78.0), coord(30.3, 78.1), "Fragile");
        let plan = plan_routes(&request, None, &PlannerConfig::default()).unwrap();

        let best = plan.best().unwrap();
        assert!(best.route.is_fallback());
        assert!(best.is_primary);
        assert!(plan.rejected.is_empty());
        assert!(plan.weather.is_none());
        assert_eq!(plan.optimization.as_ref().unwrap().crop, "Fragile");
    }

    #[test]
    fn invalid_endpoints_fail() {
        let request = RouteRequest::new(
            Coordinate {
                latitude: 95.0,
                longitude: 0.0,
            },
            coord(0.0, 0.0),
            "Fragile",
        );
        assert!(matches!(
            plan_routes(&request, None, &PlannerConfig::default()),
            Err(Error::InvalidCoordinate { .. })
        ));
    }

    #[test]
    fn bad_candidate_does_not_abort_ranking() {
        let good = CandidateRoute::new(
            vec![coord(30.0, 78.0), coord(30.3, 78.1)],
            40.0,
            50.0,
            "provider-returned",
        );
        let bad = CandidateRoute::new(vec![coord(30.0, 78.0)], 10.0, 5.0, "provider-returned");
        let request = RouteRequest::new(coord(30.0, 78.0), coord(30.3, 78.1), "Seaweed")
            .with_candidates(vec![bad, good]);

        let plan = plan_routes(&request, None, &PlannerConfig::default()).unwrap();
        assert_eq!(plan.ranked.len(), 1);
        assert_eq!(plan.ranked[0].original_index, 1);
        assert!(!plan.ranked[0].is_primary);
        assert_eq!(plan.rejected.len(), 1);
        assert_eq!(plan.rejected[0].index, 0);
        assert!(plan.evaluation_for(1).is_some());
        assert!(plan.evaluation_for(0).is_none());
        assert_eq!(plan.profile.crop_type, None);
    }

    #[test]
    fn all_rejected_means_no_route() {
        let bad = CandidateRoute::new(
            vec![coord(30.0, 78.0), coord(30.3, 78.1)],
            -1.0,
            5.0,
            "provider-returned",
        );
        let request = RouteRequest::new(coord(30.0, 78.0), coord(30.3, 78.1), "Fragile")
            .with_candidates(vec![bad]);
        let plan = plan_routes(&request, None, &PlannerConfig::default()).unwrap();
        assert!(plan.best().is_none());
        assert!(plan.optimization.is_none());
        assert!(plan.suitability.is_empty());
    }
}
