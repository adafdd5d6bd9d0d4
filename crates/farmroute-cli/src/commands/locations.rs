use anyhow::Result;

use farmroute_cli::output::{render_locations_text, OutputFormat};
use farmroute_lib::PRESET_LOCATIONS;

use super::emit;

pub fn handle_locations(format: OutputFormat) -> Result<()> {
    emit(format, &PRESET_LOCATIONS, |_| {
        render_locations_text(&PRESET_LOCATIONS)
    })
}
