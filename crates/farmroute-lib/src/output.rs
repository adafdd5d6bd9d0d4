use std::fmt::Write;

use serde::Serialize;

use crate::candidate::DistancePlausibility;
use crate::crop::CropOptimization;
use crate::planner::RoutePlan;
use crate::ranking::SuitabilityGrade;
use crate::weather::SafetyBand;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    PlainText,
    RichText,
}

/// One ranked route, flattened for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteRow {
    pub rank: usize,
    pub label: String,
    pub source: String,
    pub is_primary: bool,
    pub distance_km: f64,
    pub duration_min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety_band: Option<SafetyBand>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suitability: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<SuitabilityGrade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plausibility: Option<DistancePlausibility>,
}

/// Structured view of a [`RoutePlan`] that front ends can serialise or render.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub crop: String,
    pub routes: Vec<RouteRow>,
    pub rejected: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub optimization: Option<CropOptimization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather_recommendation: Option<String>,
}

impl RouteSummary {
    pub fn from_plan(plan: &RoutePlan) -> Self {
        let routes = plan
            .ranked
            .iter()
            .map(|entry| {
                let suitability = plan.suitability_for(entry.original_index);
                let label = match &entry.route.name {
                    Some(name) => name.clone(),
                    None => format!("Route {}", entry.original_index + 1),
                };
                RouteRow {
                    rank: entry.rank,
                    label,
                    source: entry.route.source_label.clone(),
                    is_primary: entry.is_primary,
                    distance_km: entry.route.distance_km,
                    duration_min: entry.route.duration_min,
                    safety_score: entry.route.safety.map(|s| s.score),
                    safety_band: entry.route.safety.map(|s| s.band()),
                    suitability: suitability.map(|s| s.score),
                    grade: suitability.map(|s| s.grade),
                    plausibility: plan
                        .evaluation_for(entry.original_index)
                        .map(|e| e.plausibility),
                }
            })
            .collect();

        Self {
            crop: plan.profile.label.clone(),
            routes,
            rejected: plan.rejected.len(),
            optimization: plan.optimization.clone(),
            weather_recommendation: plan.weather.as_ref().map(|w| w.recommendation.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RenderMode) -> String {
        match mode {
            RenderMode::PlainText => self.render_plain(),
            RenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if self.is_empty() {
            let _ = writeln!(buffer, "No route available for {}.", self.crop);
            return buffer;
        }

        let _ = writeln!(
            buffer,
            "Routes for {} ({} ranked, {} rejected)",
            self.crop,
            self.routes.len(),
            self.rejected
        );
        for row in &self.routes {
            let _ = writeln!(
                buffer,
                "{:>2}. {}{} ({}): {:.1} km, {:.0} min{}{}",
                row.rank,
                row.label,
                if row.is_primary { " [primary]" } else { "" },
                row.source,
                row.distance_km,
                row.duration_min,
                safety_text(row),
                suitability_text(row),
            );
            if let Some(plausibility) = row.plausibility.filter(|p| !p.is_plausible()) {
                let _ = writeln!(buffer, "    warning: reported distance {}", plausibility.label());
            }
        }

        if let Some(plan) = &self.optimization {
            let _ = writeln!(buffer, "{}", optimization_text(plan));
        }
        if let Some(recommendation) = &self.weather_recommendation {
            let _ = writeln!(buffer, "{recommendation}");
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        if self.is_empty() {
            let _ = writeln!(buffer, "**No route available** for _{}_", self.crop);
            return buffer;
        }

        let _ = writeln!(buffer, "**Routes for {}**", self.crop);
        for row in &self.routes {
            let _ = writeln!(
                buffer,
                "* {}. **{}**{} `{:.1} km` `{:.0} min`{}{}",
                row.rank,
                row.label,
                if row.is_primary { " _(primary)_" } else { "" },
                row.distance_km,
                row.duration_min,
                safety_text(row),
                suitability_text(row),
            );
        }
        if let Some(plan) = &self.optimization {
            let _ = writeln!(buffer, "> {}", optimization_text(plan));
        }
        if let Some(recommendation) = &self.weather_recommendation {
            let _ = writeln!(buffer, "> {recommendation}");
        }
        buffer
    }
}

fn safety_text(row: &RouteRow) -> String {
    match (row.safety_score, row.safety_band) {
        (Some(score), Some(band)) => format!(", safety {score:.0} ({})", band.label()),
        _ => String::new(),
    }
}

fn suitability_text(row: &RouteRow) -> String {
    match (row.suitability, row.grade) {
        (Some(score), Some(grade)) => format!(", suitability {score:.0} [{grade}]"),
        _ => String::new(),
    }
}

fn optimization_text(plan: &CropOptimization) -> String {
    format!(
        "ETA {:.0} min at {:.1} km/h, {} stop(s), {} priority",
        plan.eta_minutes, plan.adjusted_speed_kmh, plan.recommended_stops, plan.priority
    )
}
