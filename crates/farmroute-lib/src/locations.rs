//! Named farm and market locations around Dehradun.

use serde::Serialize;

use crate::error::{fuzzy_matches, Error, Result};
use crate::geo::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PresetLocation {
    pub name: &'static str,
    pub coordinate: Coordinate,
}

const fn preset(name: &'static str, latitude: f64, longitude: f64) -> PresetLocation {
    PresetLocation {
        name,
        coordinate: Coordinate {
            latitude,
            longitude,
        },
    }
}

pub const PRESET_LOCATIONS: [PresetLocation; 15] = [
    preset("Clock Tower (City Center)", 30.32524771594182, 78.0412247750176),
    preset("ISBT Dehradun", 30.28949015941415, 77.997370426645),
    preset("Rajpur Road", 30.324786144964126, 78.04206627289855),
    preset("Sahastradhara Road", 30.358404480937825, 78.08800831001025),
    preset("Mussoorie Diversion", 30.371626982890795, 78.0774532247974),
    preset("Rispana", 30.29575309297316, 78.05628846682623),
    preset("Clement Town", 30.269080492236917, 78.00702082578448),
    preset("Patel Nagar", 30.310787064565137, 78.02028477928296),
    preset("Rajendra Nagar", 30.339703077426826, 78.02318300271952),
    preset("Ballupur", 30.33375980211612, 78.01142029317087),
    preset("Raipur", 30.30943210572888, 78.09293890340565),
    preset("Premnagar", 30.333775888326592, 77.9592646449722),
    preset("Selaqui", 30.368686788624988, 77.8640125033011),
    preset("Vikasnagar Road", 30.458511087625936, 77.76576582260995),
    preset("Doiwala", 30.17628822557042, 78.12184634139498),
];

/// Look up a preset by name, ignoring case and surrounding whitespace.
pub fn resolve_location(name: &str) -> Result<PresetLocation> {
    let wanted = name.trim();
    PRESET_LOCATIONS
        .iter()
        .find(|location| location.name.eq_ignore_ascii_case(wanted))
        .copied()
        .ok_or_else(|| Error::UnknownLocation {
            name: name.to_string(),
            suggestions: fuzzy_matches(
                wanted,
                PRESET_LOCATIONS.iter().map(|location| location.name),
                3,
            ),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid_coordinates() {
        for location in PRESET_LOCATIONS {
            location.coordinate.validate().unwrap();
        }
    }

    #[test]
    fn lookup_ignores_case() {
        let found = resolve_location("  doiwala ").unwrap();
        assert_eq!(found.name, "Doiwala");
        assert_eq!(found.coordinate.latitude, 30.17628822557042);
    }

    #[test]
    fn unknown_location_suggests_close_names() {
        match resolve_location("Rajpur Rd") {
            Err(Error::UnknownLocation { suggestions, .. }) => {
                assert_eq!(suggestions.first().map(String::as_str), Some("Rajpur Road"));
            }
            other => panic!("unexpected result {other:?}"),
        }
    }
}
