use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the farm route library.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of library failures.
///
/// Callers that only need to decide between "reject the input", "report that
/// no route exists" and "degrade because a collaborator is down" can match on
/// this instead of the full [`Error`] enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    NoPathFound,
    UpstreamUnavailable,
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Latitude or longitude outside the valid range, or not finite.
    #[error("invalid coordinate ({latitude}, {longitude}); latitude must be within [-90, 90] and longitude within [-180, 180]")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Waypoint sequences need at least a start and an end.
    #[error("waypoint sequence needs at least 2 points, got {count}")]
    TooFewWaypoints { count: usize },

    /// Raised when a graph edge references a missing node or carries an unusable weight.
    #[error("invalid graph edge {from} -> {to} (weight {weight}) for a graph of {node_count} nodes")]
    InvalidEdge {
        from: usize,
        to: usize,
        weight: f64,
        node_count: usize,
    },

    /// Raised when constructing a graph without any nodes.
    #[error("graph must contain at least one node")]
    EmptyGraph,

    /// Raised when a candidate route violates its invariants.
    #[error("invalid candidate route: {message}")]
    InvalidCandidate { message: String },

    /// Raised when both endpoints of a synthesized route coincide.
    #[error("start and end coincide at ({latitude}, {longitude}); cannot synthesize a route")]
    IdenticalEndpoints { latitude: f64, longitude: f64 },

    /// Raised when a crop type name is not part of the known classes.
    #[error("unknown crop type: {name}{}", format_suggestions(.suggestions))]
    UnknownCropType {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a preset location name is not recognised.
    #[error("unknown location: {name}{}", format_suggestions(.suggestions))]
    UnknownLocation {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when no path connects two nodes of a graph.
    #[error("no path found between node {start} and node {end}")]
    NoPathFound { start: usize, end: usize },

    /// Raised by collaborators (weather, routing) when they cannot answer.
    #[error("{service} is unavailable: {message}")]
    UpstreamUnavailable { service: String, message: String },

    /// Raised when planner configuration values are out of range.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when a configuration file cannot be read.
    #[error("failed to read configuration from {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Wrapper for JSON (de)serialization errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Classify this error into one of the coarse [`ErrorKind`]s.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoPathFound { .. } => ErrorKind::NoPathFound,
            Error::UpstreamUnavailable { .. } => ErrorKind::UpstreamUnavailable,
            _ => ErrorKind::InvalidInput,
        }
    }

    pub(crate) fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Error::UpstreamUnavailable {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Rank `candidates` by similarity to `name`, returning at most `limit` close matches.
pub(crate) fn fuzzy_matches<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<String> {
    let needle = name.to_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .into_iter()
        .map(|candidate| {
            let score = strsim::jaro_winkler(&needle, &candidate.to_lowercase());
            (score, candidate)
        })
        .filter(|(score, _)| *score >= 0.7)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate.to_string())
        .collect()
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variant() {
        assert_eq!(
            Error::TooFewWaypoints { count: 1 }.kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(
            Error::NoPathFound { start: 0, end: 3 }.kind(),
            ErrorKind::NoPathFound
        );
        assert_eq!(
            Error::upstream("weather", "timeout").kind(),
            ErrorKind::UpstreamUnavailable
        );
    }

    #[test]
    fn suggestions_are_rendered() {
        let err = Error::UnknownCropType {
            name: "Fragil".to_string(),
            suggestions: vec!["Fragile".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "unknown crop type: Fragil. Did you mean 'Fragile'?"
        );

        let err = Error::UnknownLocation {
            name: "Raj".to_string(),
            suggestions: vec!["Rajpur Road".to_string(), "Rajendra Nagar".to_string()],
        };
        assert!(err
            .to_string()
            .ends_with("Did you mean one of: 'Rajpur Road', 'Rajendra Nagar'?"));
    }

    #[test]
    fn fuzzy_matches_prefers_closest() {
        let matches = fuzzy_matches("Highly Perishabel", ["Highly Perishable", "Fragile"], 3);
        assert_eq!(matches, vec!["Highly Perishable".to_string()]);
        assert!(fuzzy_matches("zzzz", ["Fragile"], 3).is_empty());
    }
}
