use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use crate::candidate::CandidateRoute;
use crate::crop::{CropProfile, CropType};
use crate::weather::{
    observe_or_default, risk_factors, score_weather_safety, WeatherObservation, WeatherSource,
};

/// Ordering applied by [`rank_routes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMode {
    /// Fastest first.
    #[default]
    Default,
    /// Safest first, then fastest.
    WeatherAware,
}

impl fmt::Display for RankMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            RankMode::Default => "default",
            RankMode::WeatherAware => "weather-aware",
        };
        f.write_str(value)
    }
}

/// A candidate with its position in the ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRoute {
    /// 1-based position.
    pub rank: usize,
    /// Position in the list the collaborator returned.
    pub original_index: usize,
    /// The collaborator's first route, labelled as the primary reference
    /// wherever it ends up in the ranking.
    pub is_primary: bool,
    pub route: CandidateRoute,
}

/// Order `candidates` deterministically.
///
/// Default mode sorts by duration, then distance, then original position.
/// Weather-aware mode puts higher safety scores first, with unevaluated
/// routes after every evaluated one, and falls back to the default key.
/// The input is not modified.
///
/// # Examples
///
/// ```
/// use farmroute_lib::weather::SafetyAssessment;
/// use farmroute_lib::{rank_routes, CandidateRoute, Coordinate, RankMode};
///
/// let geometry = vec![
///     Coordinate::new(30.0, 78.0).unwrap(),
///     Coordinate::new(30.1, 78.1).unwrap(),
/// ];
/// let safe = CandidateRoute::new(geometry.clone(), 25.0, 30.0, "provider-returned")
///     .with_safety(SafetyAssessment { score: 90.0, is_risky: false });
/// let fast = CandidateRoute::new(geometry, 20.0, 20.0, "provider-returned")
///     .with_safety(SafetyAssessment { score: 40.0, is_risky: true });
/// let candidates = vec![safe, fast];
///
/// let by_speed = rank_routes(&candidates, RankMode::Default);
/// assert_eq!(by_speed[0].original_index, 1);
///
/// let by_safety = rank_routes(&candidates, RankMode::WeatherAware);
/// assert_eq!(by_safety[0].original_index, 0);
/// ```
pub fn rank_routes(candidates: &[CandidateRoute], mode: RankMode) -> Vec<RankedRoute> {
    rank_indexed(candidates.iter().cloned().enumerate().collect(), mode)
}

/// Rank routes that keep their own original index, e.g. the survivors of a
/// validation pass.
pub(crate) fn rank_indexed(
    mut entries: Vec<(usize, CandidateRoute)>,
    mode: RankMode,
) -> Vec<RankedRoute> {
    entries.sort_by(|(ia, a), (ib, b)| {
        let safety = match mode {
            RankMode::Default => Ordering::Equal,
            RankMode::WeatherAware => compare_safety(a, b),
        };
        safety
            .then_with(|| a.duration_min.total_cmp(&b.duration_min))
            .then_with(|| a.distance_km.total_cmp(&b.distance_km))
            .then_with(|| ia.cmp(ib))
    });

    entries
        .into_iter()
        .enumerate()
        .map(|(position, (original_index, route))| RankedRoute {
            rank: position + 1,
            original_index,
            is_primary: original_index == 0,
            route,
        })
        .collect()
}

fn compare_safety(a: &CandidateRoute, b: &CandidateRoute) -> Ordering {
    match (a.safety, b.safety) {
        (Some(sa), Some(sb)) => sb.score.total_cmp(&sa.score),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Attach a safety assessment from the weather at each route's start point
/// and rank weather-aware. Works on copies; `candidates` is untouched.
pub fn prioritize_by_weather(
    candidates: &[CandidateRoute],
    source: &dyn WeatherSource,
) -> Vec<RankedRoute> {
    let scored = candidates
        .iter()
        .map(|route| {
            let mut route = route.clone();
            score_start_weather(&mut route, source);
            route
        })
        .enumerate()
        .collect();
    rank_indexed(scored, RankMode::WeatherAware)
}

/// Attach the safety assessment for the weather at `route`'s start point.
pub(crate) fn score_start_weather(route: &mut CandidateRoute, source: &dyn WeatherSource) {
    let Some(start) = route.start() else {
        return;
    };
    let observation = observe_or_default(source, start);
    let assessment = score_weather_safety(&observation);
    tracing::debug!(
        route = route.display_name(),
        score = assessment.score,
        risky = assessment.is_risky,
        "scored route weather"
    );
    route.safety = Some(assessment);
}

/// Result of a weather reroute check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerouteOutcome {
    /// Weather at the primary route's start, if there is a primary route.
    pub primary_weather: Option<WeatherObservation>,
    pub primary_risky: bool,
    pub risk_factors: Vec<String>,
    pub ranked: Vec<RankedRoute>,
    /// Whether the top recommendation is no longer the primary route.
    pub recommendation_changed: bool,
}

/// Check the primary route's weather and return the weather-aware ranking.
pub fn reroute_for_weather(
    candidates: &[CandidateRoute],
    source: &dyn WeatherSource,
) -> RerouteOutcome {
    let primary_weather = candidates
        .first()
        .and_then(CandidateRoute::start)
        .map(|start| observe_or_default(source, start));

    let (primary_risky, factors) = match &primary_weather {
        Some(observation) => (
            score_weather_safety(observation).is_risky,
            risk_factors(observation)
                .into_iter()
                .map(str::to_string)
                .collect(),
        ),
        None => (false, Vec::new()),
    };

    let ranked = prioritize_by_weather(candidates, source);
    let recommendation_changed = ranked.first().is_some_and(|top| !top.is_primary);
    if recommendation_changed {
        tracing::info!(
            primary_risky,
            "weather-aware ranking recommends an alternative to the primary route"
        );
    }

    RerouteOutcome {
        primary_weather,
        primary_risky,
        risk_factors: factors,
        ranked,
        recommendation_changed,
    }
}

const BASELINE_DURATION_MIN: f64 = 20.0;
const BASELINE_DISTANCE_KM: f64 = 10.0;

/// Advisory crop suitability of a route in `[0, 100]`.
///
/// ```
/// use farmroute_lib::suitability_score;
///
/// assert_eq!(suitability_score(1.2, 20.0, 10.0), 100.0);
/// assert_eq!(suitability_score(1.0, 40.0, 30.0), 70.0);
/// ```
pub fn suitability_score(urgency: f64, duration_min: f64, distance_km: f64) -> f64 {
    let time_penalty = urgency * (duration_min - BASELINE_DURATION_MIN);
    let distance_penalty = 0.5 * urgency * (distance_km - BASELINE_DISTANCE_KM);
    (100.0 - time_penalty - distance_penalty).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SuitabilityGrade {
    A,
    B,
    C,
}

impl SuitabilityGrade {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            SuitabilityGrade::A
        } else if score >= 60.0 {
            SuitabilityGrade::B
        } else {
            SuitabilityGrade::C
        }
    }
}

impl fmt::Display for SuitabilityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            SuitabilityGrade::A => "A",
            SuitabilityGrade::B => "B",
            SuitabilityGrade::C => "C",
        };
        f.write_str(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Suitability {
    pub index: usize,
    pub score: f64,
    pub grade: SuitabilityGrade,
}

/// Score every route in `routes` for the given cargo.
pub fn assess_suitability(routes: &[CandidateRoute], profile: &CropProfile) -> Vec<Suitability> {
    routes
        .iter()
        .enumerate()
        .map(|(index, route)| {
            let score = suitability_score(profile.urgency, route.duration_min, route.distance_km);
            Suitability {
                index,
                score,
                grade: SuitabilityGrade::from_score(score),
            }
        })
        .collect()
}

/// Metric a crop class optimises for when comparing routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityMetric {
    /// Duration in minutes.
    Time,
    /// Distance in kilometres.
    Cost,
    /// Distance plus a tenth of the duration.
    Balanced,
}

impl PriorityMetric {
    pub fn for_profile(profile: &CropProfile) -> Self {
        match profile.crop_type {
            Some(CropType::HighlyPerishable) => PriorityMetric::Time,
            Some(CropType::NonPerishable) => PriorityMetric::Cost,
            _ => PriorityMetric::Balanced,
        }
    }

    fn score(self, route: &CandidateRoute) -> f64 {
        match self {
            PriorityMetric::Time => route.duration_min,
            PriorityMetric::Cost => route.distance_km,
            PriorityMetric::Balanced => route.distance_km + route.duration_min / 10.0,
        }
    }
}

/// Per-route crop priority scores; lower is better.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityScores {
    pub metric: PriorityMetric,
    pub scores: Vec<f64>,
    /// First route with the lowest score, `None` for empty input.
    pub best_index: Option<usize>,
}

pub fn crop_priority_scores(profile: &CropProfile, routes: &[CandidateRoute]) -> PriorityScores {
    let metric = PriorityMetric::for_profile(profile);
    let scores: Vec<f64> = routes.iter().map(|route| metric.score(route)).collect();
    let best_index = scores
        .iter()
        .enumerate()
        .min_by(|(ia, a), (ib, b)| a.total_cmp(b).then_with(|| ia.cmp(ib)))
        .map(|(index, _)| index);

    PriorityScores {
        metric,
        scores,
        best_index,
    }
}
