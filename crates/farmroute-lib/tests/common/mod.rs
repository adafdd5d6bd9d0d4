use std::fs;
use std::path::PathBuf;

use farmroute_lib::weather::WeatherStation;
use farmroute_lib::{CandidateRoute, Coordinate};
use serde::Deserialize;

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[derive(Debug, Deserialize)]
pub struct RoutesFixture {
    pub start: Coordinate,
    pub end: Coordinate,
    pub routes: Vec<CandidateRoute>,
}

#[allow(dead_code)]
pub fn load_routes(name: &str) -> RoutesFixture {
    let raw = fs::read_to_string(fixtures_dir().join(name)).expect("read routes fixture");
    serde_json::from_str(&raw).expect("parse routes fixture")
}

#[allow(dead_code)]
pub fn load_stations() -> Vec<WeatherStation> {
    let raw = fs::read_to_string(fixtures_dir().join("weather.json")).expect("read weather fixture");
    serde_json::from_str(&raw).expect("parse weather fixture")
}
