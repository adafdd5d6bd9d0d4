use anyhow::{bail, Result};
use clap::Args;

use farmroute_cli::output::{render_eta_text, OutputFormat};
use farmroute_lib::{optimize_for_profile, CropProfile, PlannerConfig};

use super::{emit, ensure_quantity};

#[derive(Args, Debug)]
pub struct EtaArgs {
    /// Route distance in kilometres.
    #[arg(long)]
    pub distance: f64,
    /// Crop class, e.g. "Highly Perishable" or "bulk-heavy".
    #[arg(long)]
    pub crop: String,
    /// Cargo quantity in kg (shown only).
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    pub quantity: f64,
}

pub fn handle_eta(args: &EtaArgs, config: &PlannerConfig, format: OutputFormat) -> Result<()> {
    if !(args.distance.is_finite() && args.distance >= 0.0) {
        bail!("distance must be a non-negative number of kilometres");
    }
    ensure_quantity(args.quantity)?;

    let profile = CropProfile::resolve(&args.crop);
    let optimization = optimize_for_profile(args.distance, &profile, args.quantity, config);
    emit(format, &optimization, |_| {
        render_eta_text(args.distance, &profile, &optimization)
    })
}
