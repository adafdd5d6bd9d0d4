use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use serde::Deserialize;

use farmroute_cli::output::{render_routes_rich, render_routes_text, OutputFormat};
use farmroute_cli::terminal::{supports_color, ColorPalette};
use farmroute_lib::weather::{StaticWeatherSource, WeatherStation};
use farmroute_lib::{
    plan_routes, resolve_location, CandidateRoute, Coordinate, PlannerConfig, RankMode,
    RenderMode, RouteRequest, RouteSummary, WeatherSource,
};

use super::{emit, ensure_quantity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Fastest first.
    Default,
    /// Safest first, then fastest.
    WeatherAware,
}

impl From<ModeArg> for RankMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Default => RankMode::Default,
            ModeArg::WeatherAware => RankMode::WeatherAware,
        }
    }
}

#[derive(Args, Debug)]
pub struct RankArgs {
    /// JSON file with `start`, `end` and the candidate `routes`.
    #[arg(long)]
    pub routes: PathBuf,
    /// JSON file with weather stations (`location` + `observation`).
    #[arg(long)]
    pub weather: Option<PathBuf>,
    /// Crop class used for suitability and ETA.
    #[arg(long, default_value = "Moderately Perishable")]
    pub crop: String,
    /// Cargo quantity in kg (shown only).
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    pub quantity: f64,
    /// Ranking mode. Defaults to weather-aware when `--weather` is given.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
    /// Preset location overriding the file's start point.
    #[arg(long = "from")]
    pub from: Option<String>,
    /// Preset location overriding the file's end point.
    #[arg(long = "to")]
    pub to: Option<String>,
}

/// Contents of the `--routes` file.
#[derive(Debug, Deserialize)]
struct RoutesFile {
    start: Option<Coordinate>,
    end: Option<Coordinate>,
    #[serde(default)]
    routes: Vec<CandidateRoute>,
}

pub fn handle_rank(args: &RankArgs, config: &PlannerConfig, format: OutputFormat) -> Result<()> {
    ensure_quantity(args.quantity)?;
    let file: RoutesFile = read_json(&args.routes, "routes")?;

    let start = endpoint(args.from.as_deref(), file.start, "start")?;
    let end = endpoint(args.to.as_deref(), file.end, "end")?;

    let source = match &args.weather {
        Some(path) => {
            let stations: Vec<WeatherStation> = read_json(path, "weather")?;
            let source = StaticWeatherSource::new(stations, config.weather_match_radius_km);
            tracing::debug!(
                stations = source.stations().len(),
                path = %path.display(),
                "loaded weather stations"
            );
            Some(source)
        }
        None => None,
    };

    let mode = match (args.mode, &source) {
        (Some(mode), _) => mode.into(),
        (None, Some(_)) => RankMode::WeatherAware,
        (None, None) => RankMode::Default,
    };

    let request = RouteRequest::new(start, end, args.crop.clone())
        .with_candidates(file.routes)
        .with_quantity(args.quantity)
        .with_mode(mode);

    let weather = source.as_ref().map(|s| s as &dyn WeatherSource);
    let plan = plan_routes(&request, weather, config).context("failed to plan routes")?;
    let summary = RouteSummary::from_plan(&plan);

    match format {
        OutputFormat::Json => emit(format, &plan, |_| String::new())?,
        OutputFormat::Rich => print!("{}", render_routes_rich(&summary)),
        OutputFormat::Text if supports_color() => {
            print!("{}", render_routes_text(&summary, ColorPalette::colored()))
        }
        OutputFormat::Text => print!("{}", summary.render(RenderMode::PlainText)),
    }

    if plan.best().is_none() {
        bail!(
            "No route available: all {} candidate route(s) were rejected",
            plan.rejected.len()
        );
    }
    Ok(())
}

fn endpoint(preset: Option<&str>, from_file: Option<Coordinate>, which: &str) -> Result<Coordinate> {
    if let Some(name) = preset {
        let location = resolve_location(name)?;
        return Ok(location.coordinate);
    }
    from_file.ok_or_else(|| {
        anyhow!("routes file has no {which} coordinate; add one or pass a preset location")
    })
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path, what: &str) -> Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {what} file {}", path.display()))
}
