//! Geographic value types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range in degrees.
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees.
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Errors produced when building or parsing coordinates.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordError {
    #[error("Invalid latitude: {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),

    #[error("Invalid longitude: {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),

    #[error("Invalid coordinate '{0}': expected 'lat,lon'")]
    Malformed(String),
}

/// A WGS84 point.
///
/// Field order follows the way people read coordinates (latitude first).
/// Mapping services want longitude first; use [`Coordinate::lon_lat`] when
/// building request paths or GeoJSON.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,
    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting out-of-range values.
    pub fn checked(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !(MIN_LAT..=MAX_LAT).contains(&latitude) {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Builds a coordinate from a GeoJSON `[lon, lat]` pair.
    pub const fn from_lon_lat(pair: [f64; 2]) -> Self {
        Self::new(pair[1], pair[0])
    }

    /// Returns the GeoJSON `[lon, lat]` pair.
    pub const fn lon_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = CoordError;

    /// Parses `"lat,lon"` (whitespace around either value is ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CoordError::Malformed(s.to_string());
        let (lat, lon) = s.split_once(',').ok_or_else(malformed)?;
        let lat: f64 = lat.trim().parse().map_err(|_| malformed())?;
        let lon: f64 = lon.trim().parse().map_err(|_| malformed())?;
        Self::checked(lat, lon)
    }
}

/// Axis-aligned geographic bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    /// Degenerate bounds containing a single point.
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            min_lat: point.latitude,
            max_lat: point.latitude,
            min_lon: point.longitude,
            max_lon: point.longitude,
        }
    }

    /// Grows the bounds to include `point`.
    pub fn extend(&mut self, point: Coordinate) {
        self.min_lat = self.min_lat.min(point.latitude);
        self.max_lat = self.max_lat.max(point.latitude);
        self.min_lon = self.min_lon.min(point.longitude);
        self.max_lon = self.max_lon.max(point.longitude);
    }

    /// Smallest bounds covering every point, or `None` for an empty input.
    pub fn covering<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut iter = points.into_iter();
        let mut bounds = Self::from_point(iter.next()?);
        for point in iter {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn contains(&self, point: Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.latitude)
            && (self.min_lon..=self.max_lon).contains(&point.longitude)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}
