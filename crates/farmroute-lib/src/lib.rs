//! Farm-to-market route scoring library.
//!
//! This crate builds waypoint graphs from candidate routes, validates their
//! lengths with Dijkstra, scores weather safety, ranks candidates for a
//! cargo profile and derives crop-aware ETAs. It performs no network I/O:
//! routing and weather providers plug in through [`CandidateRoute`] values
//! and the [`weather::WeatherSource`] trait.
//!

#![deny(warnings)]

pub mod candidate;
pub mod config;
pub mod crop;
pub mod error;
pub mod geo;
pub mod graph;
pub mod locations;
pub mod output;
pub mod path;
pub mod planner;
pub mod ranking;
pub mod weather;

pub use candidate::{
    evaluate_candidate, fallback_route, normalize_candidates, CandidateEvaluation,
    CandidateRoute, DistancePlausibility,
};
pub use config::{DistanceCheck, PlannerConfig};
pub use crop::{
    optimize_for_crop, optimize_for_profile, CropOptimization, CropProfile, CropType, Priority,
};
pub use error::{Error, ErrorKind, Result};
pub use geo::{haversine_km, Coordinate};
pub use graph::{build_graph, PathGraph};
pub use locations::{resolve_location, PresetLocation, PRESET_LOCATIONS};
pub use output::{RenderMode, RouteSummary};
pub use path::{shortest_path, ShortestPath};
pub use planner::{plan_routes, RoutePlan, RouteRequest};
pub use ranking::{
    assess_suitability, crop_priority_scores, prioritize_by_weather, rank_routes,
    reroute_for_weather, suitability_score, RankMode, RankedRoute, SuitabilityGrade,
};
pub use weather::{score_weather_safety, WeatherObservation, WeatherSource};
