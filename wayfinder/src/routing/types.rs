//! Route value types and the directions wire format.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::ProfileParseError;
use crate::geo::{Bounds, Coordinate};

/// Travel mode for a route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl RoutingProfile {
    /// Path segment used by the directions API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Cycling => "cycling",
        }
    }
}

impl fmt::Display for RoutingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoutingProfile {
    type Err = ProfileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "driving" => Ok(Self::Driving),
            "walking" => Ok(Self::Walking),
            "cycling" => Ok(Self::Cycling),
            other => Err(ProfileParseError(other.to_string())),
        }
    }
}

/// One maneuver along a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    /// Human-readable instruction in the requested language.
    pub instruction: String,
    /// Maneuver type (`depart`, `turn`, `arrive`, ...).
    pub maneuver: String,
    pub modifier: Option<String>,
    /// Street name, empty when unnamed.
    pub street: String,
    pub distance_meters: f64,
    pub duration_seconds: f64,
}

/// A drivable path between two points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Polyline, origin first.
    pub geometry: Vec<Coordinate>,
    pub distance_meters: f64,
    pub duration_seconds: f64,
    /// Maneuvers of the first leg.
    pub steps: Vec<RouteStep>,
}

impl Route {
    /// Bounding box of the route geometry.
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::covering(self.geometry.iter().copied())
    }
}

/// Result of a route request.
///
/// `Empty` stands for "no route available" whatever the cause; fetchers
/// never surface errors to their callers.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    Empty,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            Self::Found(route) => Some(route),
            Self::Empty => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

// Wire format: only the fields the client consumes are modelled.

#[derive(Debug, Deserialize)]
pub(crate) struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<WireRoute>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireRoute {
    pub geometry: WireGeometry,
    #[serde(default)]
    pub legs: Vec<WireLeg>,
    pub duration: f64,
    pub distance: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireGeometry {
    /// `[lon, lat]` pairs.
    pub coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireLeg {
    #[serde(default)]
    pub steps: Vec<WireStep>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireStep {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub distance: f64,
    pub maneuver: WireManeuver,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireManeuver {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub modifier: Option<String>,
    #[serde(default)]
    pub instruction: String,
}

impl From<WireRoute> for Route {
    fn from(wire: WireRoute) -> Self {
        let steps = wire
            .legs
            .into_iter()
            .next()
            .map(|leg| leg.steps.into_iter().map(RouteStep::from).collect())
            .unwrap_or_default();

        Self {
            geometry: wire
                .geometry
                .coordinates
                .into_iter()
                .map(Coordinate::from_lon_lat)
                .collect(),
            distance_meters: wire.distance,
            duration_seconds: wire.duration,
            steps,
        }
    }
}

impl From<WireStep> for RouteStep {
    fn from(wire: WireStep) -> Self {
        Self {
            instruction: wire.maneuver.instruction,
            maneuver: wire.maneuver.kind,
            modifier: wire.maneuver.modifier,
            street: wire.name,
            distance_meters: wire.distance,
            duration_seconds: wire.duration,
        }
    }
}
