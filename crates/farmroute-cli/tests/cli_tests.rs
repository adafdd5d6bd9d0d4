//! Integration tests for the `farmroute-cli` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../docs/fixtures")
        .join(name)
}

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("farmroute-cli").expect("binary exists");
    cmd.env("NO_COLOR", "1")
        .env("RUST_LOG", "warn")
        .env_remove("FARMROUTE_CONFIG");
    cmd
}

#[test]
fn rank_orders_fixture_routes() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("candidates.json"))
        .args(["--crop", "Highly Perishable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Premnagar Bypass"))
        .stdout(predicate::str::contains("2. Chakrata Road [primary]"))
        .stdout(predicate::str::contains("(2 ranked, 1 rejected)"))
        .stdout(predicate::str::contains("high priority"));
}

#[test]
fn rank_json_output_parses() {
    let output = cli()
        .args(["--format", "json", "rank", "--routes"])
        .arg(fixture("candidates.json"))
        .output()
        .expect("run cli");
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(plan["ranked"][0]["original_index"], 1);
    assert_eq!(plan["ranked"][1]["is_primary"], true);
    assert_eq!(plan["rejected"][0]["index"], 2);
}

#[test]
fn weather_file_switches_to_weather_aware_mode() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("candidates.json"))
        .arg("--weather")
        .arg(fixture("weather.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("safety 55 (unsafe)"))
        .stdout(predicate::str::contains("Weather Alert"));
}

#[test]
fn empty_routes_fall_back_to_straight_line() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("empty_routes.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Route 1 [primary] (synthesized-fallback)"));
}

#[test]
fn preset_locations_override_endpoints() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("empty_routes.json"))
        .args(["--from", "selaqui", "--to", "Doiwala"])
        .assert()
        .success()
        .stdout(predicate::str::contains("synthesized-fallback"));
}

#[test]
fn unknown_location_suggests_names() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("empty_routes.json"))
        .args(["--from", "Doiwalla"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Did you mean 'Doiwala'?"));
}

#[test]
fn all_rejected_routes_fail_with_message() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("routes.json");
    fs::write(
        &path,
        r#"{"start": [30.0, 78.0], "end": [30.3, 78.1],
            "routes": [{"coordinates": [[30.0, 78.0]], "distance_km": 4.0, "duration_min": 5.0}]}"#,
    )
    .expect("write routes");

    cli()
        .args(["rank", "--routes"])
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("No route available"))
        .stderr(predicate::str::contains("No route available"));
}

#[test]
fn eta_reference_case() {
    cli()
        .args(["eta", "--distance", "100", "--crop", "Highly Perishable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42.5 km/h"))
        .stdout(predicate::str::contains("1 rest stop(s)"))
        .stdout(predicate::str::contains("high priority"))
        .stdout(predicate::str::contains("Typical produce: Leafy Greens"));
}

#[test]
fn eta_rejects_non_positive_quantity() {
    for quantity in ["-5", "0", "NaN"] {
        cli()
            .args(["eta", "--distance", "100", "--crop", "Fragile", "--quantity", quantity])
            .assert()
            .failure()
            .stderr(predicate::str::contains("quantity must be a positive number"));
    }
}

#[test]
fn rank_rejects_negative_quantity() {
    cli()
        .args(["rank", "--routes"])
        .arg(fixture("candidates.json"))
        .args(["--quantity", "-250"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("quantity must be a positive number"));
}

#[test]
fn eta_unknown_crop_degrades() {
    cli()
        .args(["--format", "json", "eta", "--distance", "75", "--crop", "Mangoes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"adjusted_speed_kmh\": 50.0"))
        .stdout(predicate::str::contains("\"priority\": \"medium\""));
}

#[test]
fn eta_honours_config_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("farmroute.json");
    fs::write(&path, r#"{"base_speed_kmh": 60.0}"#).expect("write config");

    cli()
        .arg("--config")
        .arg(&path)
        .args(["eta", "--distance", "120", "--crop", "Moderately Perishable"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ETA 2h 00m at 60.0 km/h"));
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("farmroute.json");
    fs::write(&path, r#"{"fallback_points": 0}"#).expect("write config");

    cli()
        .arg("--config")
        .arg(&path)
        .arg("locations")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load planner configuration"));
}

#[test]
fn weather_command_reports_risk() {
    cli()
        .args([
            "weather",
            "--temperature",
            "22",
            "--precipitation",
            "1",
            "--wind",
            "10",
            "--code",
            "61",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Conditions: Slight rain"))
        .stdout(predicate::str::contains("Safety score: 100 (safe)"))
        .stdout(predicate::str::contains("Risky: yes"));
}

#[test]
fn locations_lists_presets() {
    cli()
        .arg("locations")
        .assert()
        .success()
        .stdout(predicate::str::contains("Preset locations (15):"))
        .stdout(predicate::str::contains("Vikasnagar Road"));
}
