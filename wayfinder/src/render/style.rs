//! Layer styles.
//!
//! Live and test layers use distinct palettes so a tester can tell at a
//! glance which flow is being drawn.

use serde::Serialize;

/// Circle marker paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: &'static str,
    pub radius: f64,
    pub stroke_color: Option<&'static str>,
    pub stroke_width: f64,
}

/// Polyline paint. Joins and caps are always round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: &'static str,
    pub width: f64,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LayerStyle {
    Marker(MarkerStyle),
    Line(LineStyle),
}

pub const ORIGIN: MarkerStyle = MarkerStyle {
    color: "#4ce05b",
    radius: 10.0,
    stroke_color: None,
    stroke_width: 0.0,
};

pub const DESTINATION: MarkerStyle = MarkerStyle {
    color: "#f30",
    radius: 10.0,
    stroke_color: None,
    stroke_width: 0.0,
};

pub const ROUTE: LineStyle = LineStyle {
    color: "#3887be",
    width: 5.0,
    opacity: 0.75,
};

pub const TEST_ORIGIN: MarkerStyle = MarkerStyle {
    color: "#007bff",
    radius: 12.0,
    stroke_color: Some("#ffffff"),
    stroke_width: 3.0,
};

pub const TEST_DESTINATION: MarkerStyle = MarkerStyle {
    color: "#ff6b35",
    radius: 12.0,
    stroke_color: Some("#ffffff"),
    stroke_width: 3.0,
};

pub const TEST_ROUTE: LineStyle = LineStyle {
    color: "#ff6b35",
    width: 6.0,
    opacity: 0.8,
};
