//! Output formatting for CLI results.
//!
//! Renderers return strings so they can be tested without capturing stdout.

use std::fmt::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use farmroute_lib::weather::{
    is_risky, risk_factors, weather_description, SafetyBand, WeatherObservation,
};
use farmroute_lib::{
    score_weather_safety, CropOptimization, CropProfile, PresetLocation, RenderMode,
    RouteSummary,
};

use crate::terminal::{format_minutes, ColorPalette};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal text.
    #[default]
    Text,
    /// Markdown-flavoured text.
    Rich,
    /// Machine-readable JSON.
    Json,
}

/// Serialize `value` as pretty JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output as JSON")
}

/// Route ranking as a colored table.
pub fn render_routes_text(summary: &RouteSummary, palette: ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();
    if summary.is_empty() {
        let _ = writeln!(
            buffer,
            "{}No route available{} for {}.",
            p.red, p.reset, summary.crop
        );
        return buffer;
    }

    let _ = writeln!(
        buffer,
        "Ranked routes for {}{}{}:",
        p.white_bold, summary.crop, p.reset
    );
    for row in &summary.routes {
        let badge = if row.is_primary {
            format!(" {}PRIMARY{}", p.tag_primary, p.reset)
        } else {
            String::new()
        };
        let _ = writeln!(
            buffer,
            "{:>2}. {}{}{}{} {}({}){}",
            row.rank, p.white_bold, row.label, p.reset, badge, p.gray, row.source, p.reset
        );
        let _ = write!(
            buffer,
            "    {:.1} km, {}",
            row.distance_km,
            format_minutes(row.duration_min)
        );
        if let (Some(score), Some(band)) = (row.safety_score, row.safety_band) {
            let _ = write!(
                buffer,
                ", safety {}{:.0} {}{}",
                p.for_band(band),
                score,
                band.label(),
                p.reset
            );
        }
        if let (Some(score), Some(grade)) = (row.suitability, row.grade) {
            let _ = write!(
                buffer,
                ", suitability {}{:.0} ({}){}",
                p.for_grade(grade),
                score,
                grade,
                p.reset
            );
        }
        let _ = writeln!(buffer);
        if let Some(plausibility) = row.plausibility.filter(|v| !v.is_plausible()) {
            let _ = writeln!(
                buffer,
                "    {}warning:{} reported distance {}",
                p.yellow,
                p.reset,
                plausibility.label()
            );
        }
    }

    if summary.rejected > 0 {
        let _ = writeln!(
            buffer,
            "{}{} candidate(s) rejected as invalid{}",
            p.gray, summary.rejected, p.reset
        );
    }
    if let Some(optimization) = &summary.optimization {
        let _ = writeln!(buffer, "{}", eta_line(optimization));
    }
    if let Some(recommendation) = &summary.weather_recommendation {
        let _ = writeln!(buffer, "{recommendation}");
    }
    buffer
}

/// Route ranking as markdown.
pub fn render_routes_rich(summary: &RouteSummary) -> String {
    summary.render(RenderMode::RichText)
}

fn eta_line(optimization: &CropOptimization) -> String {
    format!(
        "ETA {} at {:.1} km/h, {} rest stop(s), {} priority",
        format_minutes(optimization.eta_minutes),
        optimization.adjusted_speed_kmh,
        optimization.recommended_stops,
        optimization.priority
    )
}

/// Crop ETA summary, with example produce when the class is known.
pub fn render_eta_text(
    distance_km: f64,
    profile: &CropProfile,
    optimization: &CropOptimization,
) -> String {
    let mut buffer = String::new();
    let _ = writeln!(
        buffer,
        "{} ({:.0} kg) over {:.1} km",
        optimization.crop, optimization.quantity_kg, distance_km
    );
    if let Some(crop_type) = profile.crop_type {
        let _ = writeln!(buffer, "Typical produce: {}", crop_type.examples().join(", "));
    }
    let _ = writeln!(buffer, "{}", eta_line(optimization));
    buffer
}

/// Flattened weather verdict for one observation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherReport {
    pub score: f64,
    pub band: SafetyBand,
    pub is_risky: bool,
    pub risk_factors: Vec<String>,
    pub description: String,
}

impl WeatherReport {
    pub fn from_observation(observation: &WeatherObservation) -> Self {
        let assessment = score_weather_safety(observation);
        Self {
            score: assessment.score,
            band: assessment.band(),
            is_risky: is_risky(observation),
            risk_factors: risk_factors(observation)
                .into_iter()
                .map(str::to_string)
                .collect(),
            description: weather_description(observation.weather_code).to_string(),
        }
    }
}

pub fn render_weather_text(report: &WeatherReport, palette: ColorPalette) -> String {
    let p = palette;
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Conditions: {}", report.description);
    let _ = writeln!(
        buffer,
        "Safety score: {}{:.0} ({}){}",
        p.for_band(report.band),
        report.score,
        report.band.label(),
        p.reset
    );
    let risk = if report.is_risky {
        format!("{}yes, consider rerouting{}", p.red, p.reset)
    } else {
        "no".to_string()
    };
    let _ = writeln!(buffer, "Risky: {risk}");
    if report.risk_factors.is_empty() {
        let _ = writeln!(buffer, "Risk factors: none");
    } else {
        let _ = writeln!(buffer, "Risk factors: {}", report.risk_factors.join(", "));
    }
    buffer
}

pub fn render_locations_text(locations: &[PresetLocation]) -> String {
    let mut buffer = String::new();
    let _ = writeln!(buffer, "Preset locations ({}):", locations.len());
    for location in locations {
        let _ = writeln!(
            buffer,
            "{:<28} {:>10.5} {:>10.5}",
            location.name, location.coordinate.latitude, location.coordinate.longitude
        );
    }
    buffer
}
