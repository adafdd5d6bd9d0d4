mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use farmroute_cli::output::OutputFormat;
use farmroute_lib::PlannerConfig;

use commands::eta::EtaArgs;
use commands::rank::RankArgs;
use commands::weather::WeatherArgs;

#[derive(Parser, Debug)]
#[command(author, version, about = "Farm-to-market route ranking and crop ETA tools")]
struct Cli {
    /// Planner configuration file (JSON). Falls back to FARMROUTE_CONFIG.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate and rank candidate routes from a JSON file.
    Rank(RankArgs),
    /// Estimate arrival time and rest stops for a crop.
    Eta(EtaArgs),
    /// Score a single weather observation.
    Weather(WeatherArgs),
    /// List the preset farm and market locations.
    Locations,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = PlannerConfig::load(cli.config.as_deref())
        .context("failed to load planner configuration")?;

    match &cli.command {
        Command::Rank(args) => commands::rank::handle_rank(args, &config, cli.format),
        Command::Eta(args) => commands::eta::handle_eta(args, &config, cli.format),
        Command::Weather(args) => commands::weather::handle_weather(args, cli.format),
        Command::Locations => commands::locations::handle_locations(cli.format),
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    let _ = if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()
    };
}
