//! Subcommand handlers. `main.rs` parses arguments and dispatches here.

pub mod eta;
pub mod locations;
pub mod rank;
pub mod weather;

use anyhow::{bail, Result};
use serde::Serialize;

use farmroute_cli::output::{to_json, OutputFormat};

/// Print `value` as JSON, or the text produced by `render` otherwise.
pub(crate) fn emit<T, F>(format: OutputFormat, value: &T, render: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(OutputFormat) -> String,
{
    match format {
        OutputFormat::Json => println!("{}", to_json(value)?),
        other => print!("{}", render(other)),
    }
    Ok(())
}

/// Cargo quantity must be a positive, finite number of kilograms.
pub(crate) fn ensure_quantity(quantity_kg: f64) -> Result<()> {
    if !(quantity_kg.is_finite() && quantity_kg > 0.0) {
        bail!("quantity must be a positive number of kilograms, got {quantity_kg}");
    }
    Ok(())
}
