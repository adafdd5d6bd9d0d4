//! Terminal styling and color detection.

use farmroute_lib::weather::SafetyBand;
use farmroute_lib::SuitabilityGrade;

/// ANSI escape codes used by the text renderers.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for route names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details.
    pub const GRAY: &str = "\x1b[90m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    /// Bold reverse cyan for the primary-route badge.
    pub const TAG_PRIMARY: &str = "\x1b[1;7;36m";
}

/// Resolved color codes, or empty strings when color is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
    pub tag_primary: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            yellow: colors::YELLOW,
            red: colors::RED,
            tag_primary: colors::TAG_PRIMARY,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            yellow: "",
            red: "",
            tag_primary: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, else `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Green, yellow or red by safety band.
    #[must_use]
    pub fn for_band(&self, band: SafetyBand) -> &'static str {
        match band {
            SafetyBand::Safe => self.green,
            SafetyBand::Caution => self.yellow,
            SafetyBand::Unsafe => self.red,
        }
    }

    #[must_use]
    pub fn for_grade(&self, grade: SuitabilityGrade) -> &'static str {
        match grade {
            SuitabilityGrade::A => self.green,
            SuitabilityGrade::B => self.yellow,
            SuitabilityGrade::C => self.red,
        }
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Honours `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format minutes as `1h 05m`, or `42 min` under an hour.
#[must_use]
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    if total < 60 {
        format!("{total} min")
    } else {
        format!("{}h {:02}m", total / 60, total % 60)
    }
}
