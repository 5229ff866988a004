//! Core location value types.
//!
//! - [`Location`] - A resolved position estimate (live or mock)
//! - [`LocationSource`] - Which backend produced it
//! - [`MockLocation`] - Operator-supplied position with simulated sensor fields

use std::time::Duration;

use tokio::time::Instant;

use crate::geo::{haversine_km, Coordinate};

/// Backend that produced a [`Location`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationSource {
    /// Device positioning.
    Live,
    /// Operator-set mock position.
    Mock,
}

impl std::fmt::Display for LocationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "Live"),
            Self::Mock => write!(f, "Mock"),
        }
    }
}

/// A point estimate of the user's position.
///
/// Locations are immutable: a newer fix supersedes an older one, it never
/// mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Horizontal accuracy radius in meters, when the backend reports one.
    pub accuracy: Option<f64>,

    /// Backend that produced this location.
    pub source: LocationSource,

    /// When this location was resolved (tokio clock, so paused-time tests
    /// can age it).
    pub timestamp: Instant,
}

impl Location {
    /// Create a location from a device fix.
    pub fn live(latitude: f64, longitude: f64, accuracy: Option<f64>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            source: LocationSource::Live,
            timestamp: Instant::now(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }

    /// Age of this location.
    pub fn age(&self) -> Duration {
        self.timestamp.elapsed()
    }

    /// True when older than `threshold`.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        self.age() > threshold
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km_to(&self, other: Coordinate) -> f64 {
        haversine_km(self.coordinate(), other)
    }
}

/// A simulated position used while testing.
///
/// Carries the same sensor fields a device fix would (altitude, heading,
/// speed) so consumers that read them see plausible values. While a mock is
/// active, live device updates are suppressed.
#[derive(Debug, Clone, PartialEq)]
pub struct MockLocation {
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy in meters.
    pub accuracy: f64,
    /// Altitude in meters.
    pub altitude: Option<f64>,
    pub altitude_accuracy: Option<f64>,
    /// Heading in degrees clockwise from true north.
    pub heading: Option<f64>,
    /// Speed in meters per second.
    pub speed: Option<f64>,
}

impl MockLocation {
    /// Default accuracy reported for mock positions.
    pub const DEFAULT_ACCURACY: f64 = 10.0;

    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: Self::DEFAULT_ACCURACY,
            altitude: None,
            altitude_accuracy: None,
            heading: None,
            speed: None,
        }
    }

    pub fn at(coordinate: Coordinate) -> Self {
        Self::new(coordinate.latitude, coordinate.longitude)
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_altitude(mut self, altitude: f64, altitude_accuracy: Option<f64>) -> Self {
        self.altitude = Some(altitude);
        self.altitude_accuracy = altitude_accuracy;
        self
    }

    pub fn with_motion(mut self, heading: f64, speed: f64) -> Self {
        self.heading = Some(heading);
        self.speed = Some(speed);
        self
    }

    /// The location value published while this mock is active.
    pub fn to_location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: Some(self.accuracy),
            source: LocationSource::Mock,
            timestamp: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_live_location() {
        let loc = Location::live(20.6597, -103.3496, Some(12.5));
        assert_eq!(loc.source, LocationSource::Live);
        assert_eq!(loc.coordinate(), Coordinate::new(20.6597, -103.3496));
        assert_eq!(loc.accuracy, Some(12.5));
    }

    #[test]
    fn test_mock_to_location() {
        let mock = MockLocation::new(20.674289, -103.386854)
            .with_accuracy(5.0)
            .with_motion(90.0, 1.5);
        let loc = mock.to_location();

        assert_eq!(loc.source, LocationSource::Mock);
        assert_eq!(loc.latitude, 20.674289);
        assert_eq!(loc.accuracy, Some(5.0));
        assert_eq!(mock.heading, Some(90.0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_staleness() {
        let loc = Location::live(0.0, 0.0, None);
        assert!(!loc.is_stale(Duration::from_secs(60)));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert!(loc.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_distance_km_to() {
        let loc = Location::live(20.674289, -103.386854, None);
        let d = loc.distance_km_to(Coordinate::new(20.689791, -103.417812));
        assert!(d > 3.0 && d < 4.0);
    }
}
