//! Geographic primitives: coordinates, great-circle distance and simple
//! straight-line geometry.
//!
//! The haversine distance is the only edge-cost function used by the rest of
//! the crate, so every graph weight and every validated route length is
//! measured in kilometres on a sphere of radius [`EARTH_RADIUS_KM`].

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as a `[lat, lon]` array so route geometries read the same way
/// routing providers usually hand them out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a validated coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use farmroute_lib::Coordinate;
    ///
    /// let clock_tower = Coordinate::new(30.3252, 78.0412).unwrap();
    /// assert_eq!(clock_tower.latitude, 30.3252);
    /// assert!(Coordinate::new(91.0, 0.0).is_err());
    /// ```
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let coordinate = Self {
            latitude,
            longitude,
        };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check range and finiteness; deserialized values skip [`Coordinate::new`].
    pub fn validate(&self) -> Result<()> {
        let lat_ok = self.latitude.is_finite() && (-90.0..=90.0).contains(&self.latitude);
        let lon_ok = self.longitude.is_finite() && (-180.0..=180.0).contains(&self.longitude);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(Error::InvalidCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_km(*self, *other)
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((latitude, longitude): (f64, f64)) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl From<Coordinate> for (f64, f64) {
    fn from(value: Coordinate) -> Self {
        (value.latitude, value.longitude)
    }
}

/// Great-circle distance between two coordinates in kilometres.
///
/// Pure and total for valid coordinates; out-of-range inputs produce a
/// meaningless number rather than an error, so callers validate first.
///
/// # Examples
///
/// ```
/// use farmroute_lib::{haversine_km, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0).unwrap();
/// let b = Coordinate::new(0.0, 1.0).unwrap();
/// assert!((haversine_km(a, b) - 111.19).abs() < 0.01);
/// assert_eq!(haversine_km(a, a), 0.0);
/// ```
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_KM * c
}

/// Arithmetic midpoint of two coordinates.
///
/// Good enough for probing weather halfway along a short regional route; it
/// is not the great-circle midpoint.
pub fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Coordinate {
        latitude: (a.latitude + b.latitude) / 2.0,
        longitude: (a.longitude + b.longitude) / 2.0,
    }
}

/// Linearly interpolate `segments + 1` points from `start` to `end`.
///
/// A `segments` value of zero is treated as one so the result always has at
/// least the two endpoints.
pub fn interpolate_straight_line(
    start: Coordinate,
    end: Coordinate,
    segments: usize,
) -> Vec<Coordinate> {
    let segments = segments.max(1);
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            Coordinate {
                latitude: start.latitude + (end.latitude - start.latitude) * t,
                longitude: start.longitude + (end.longitude - start.longitude) * t,
            }
        })
        .collect()
}

/// Sum of great-circle distances between consecutive waypoints.
pub fn path_length_km(waypoints: &[Coordinate]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| haversine_km(pair[0], pair[1]))
        .sum()
}
