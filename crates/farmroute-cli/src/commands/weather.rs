use anyhow::Result;
use clap::Args;

use farmroute_cli::output::{render_weather_text, OutputFormat, WeatherReport};
use farmroute_cli::terminal::ColorPalette;
use farmroute_lib::WeatherObservation;

use super::emit;

#[derive(Args, Debug)]
pub struct WeatherArgs {
    /// Air temperature in °C.
    #[arg(long, allow_hyphen_values = true)]
    pub temperature: f64,
    /// Precipitation in mm.
    #[arg(long, default_value_t = 0.0)]
    pub precipitation: f64,
    /// Rain in mm, when reported separately from precipitation.
    #[arg(long)]
    pub rain: Option<f64>,
    /// Wind speed in km/h.
    #[arg(long, default_value_t = 0.0)]
    pub wind: f64,
    /// WMO weather condition code.
    #[arg(long, default_value_t = 0)]
    pub code: i32,
}

impl WeatherArgs {
    fn observation(&self) -> WeatherObservation {
        WeatherObservation {
            temperature_c: self.temperature,
            precipitation_mm: self.precipitation,
            rain_mm: self.rain,
            wind_speed_kmh: self.wind,
            weather_code: self.code,
        }
    }
}

pub fn handle_weather(args: &WeatherArgs, format: OutputFormat) -> Result<()> {
    let report = WeatherReport::from_observation(&args.observation());
    tracing::debug!(score = report.score, risky = report.is_risky, "scored observation");
    emit(format, &report, |format| {
        let palette = match format {
            OutputFormat::Text => ColorPalette::detect(),
            _ => ColorPalette::plain(),
        };
        render_weather_text(&report, palette)
    })
}
