//! Render plans derived from navigation state.

use std::fmt;

use serde::Serialize;

use super::style::{self, LayerStyle};
use crate::geo::{Bounds, Coordinate};
use crate::navigation::NavigationState;
use crate::routing::RouteOutcome;

/// Map center when nothing is drawn (Guadalajara).
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(20.6597, -103.3496);

pub const DEFAULT_ZOOM: f64 = 13.0;

/// Fit-bounds padding in pixels for live layers.
pub const LIVE_PADDING: u32 = 50;

/// Fit-bounds padding in pixels for test layers.
pub const TEST_PADDING: u32 = 80;

/// What a layer depicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerRole {
    Origin,
    Destination,
    Route,
}

/// Which flow a layer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerVariant {
    Live,
    Test,
}

/// Stable layer identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LayerId {
    pub role: LayerRole,
    pub variant: LayerVariant,
}

impl LayerId {
    pub const fn new(role: LayerRole, variant: LayerVariant) -> Self {
        Self { role, variant }
    }

    /// Identifier used by map libraries (`origin-circle`, `test-route`, ...).
    pub fn name(&self) -> &'static str {
        match (self.variant, self.role) {
            (LayerVariant::Live, LayerRole::Origin) => "origin-circle",
            (LayerVariant::Live, LayerRole::Destination) => "destination-circle",
            (LayerVariant::Live, LayerRole::Route) => "route",
            (LayerVariant::Test, LayerRole::Origin) => "test-origin-circle",
            (LayerVariant::Test, LayerRole::Destination) => "test-destination-circle",
            (LayerVariant::Test, LayerRole::Route) => "test-route",
        }
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates", rename_all = "lowercase")]
pub enum LayerGeometry {
    Point(Coordinate),
    Line(Vec<Coordinate>),
}

impl LayerGeometry {
    fn points(&self) -> &[Coordinate] {
        match self {
            Self::Point(point) => std::slice::from_ref(point),
            Self::Line(points) => points,
        }
    }
}

/// One drawable layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub id: LayerId,
    pub geometry: LayerGeometry,
    pub style: LayerStyle,
}

/// Camera instruction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Camera {
    FitBounds { bounds: Bounds, padding: u32 },
    Center { center: Coordinate, zoom: f64 },
}

/// Everything a renderer needs to draw one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub layers: Vec<Layer>,
    pub camera: Camera,
}

impl RenderPlan {
    /// Derive the plan for `state`.
    ///
    /// - origin marker iff `location` is set
    /// - destination marker iff `destination` is set and the pin is shown
    /// - route line iff `route` is a found route
    ///
    /// All layers share one variant, so live and test layers never coexist.
    pub fn from_state(state: &NavigationState) -> Self {
        let (variant, padding) = if state.test_mode_active {
            (LayerVariant::Test, TEST_PADDING)
        } else {
            (LayerVariant::Live, LIVE_PADDING)
        };

        let mut layers = Vec::with_capacity(3);

        if let Some(location) = &state.location {
            layers.push(Layer {
                id: LayerId::new(LayerRole::Origin, variant),
                geometry: LayerGeometry::Point(location.coordinate()),
                style: LayerStyle::Marker(match variant {
                    LayerVariant::Live => style::ORIGIN,
                    LayerVariant::Test => style::TEST_ORIGIN,
                }),
            });
        }

        if let Some(destination) = state.destination.as_ref().filter(|_| state.show_destination_pin) {
            layers.push(Layer {
                id: LayerId::new(LayerRole::Destination, variant),
                geometry: LayerGeometry::Point(destination.coordinate),
                style: LayerStyle::Marker(match variant {
                    LayerVariant::Live => style::DESTINATION,
                    LayerVariant::Test => style::TEST_DESTINATION,
                }),
            });
        }

        if let Some(RouteOutcome::Found(route)) = &state.route {
            if !route.geometry.is_empty() {
                layers.push(Layer {
                    id: LayerId::new(LayerRole::Route, variant),
                    geometry: LayerGeometry::Line(route.geometry.clone()),
                    style: LayerStyle::Line(match variant {
                        LayerVariant::Live => style::ROUTE,
                        LayerVariant::Test => style::TEST_ROUTE,
                    }),
                });
            }
        }

        let points = layers
            .iter()
            .flat_map(|layer| layer.geometry.points().iter().copied());
        let camera = match Bounds::covering(points) {
            Some(bounds) => Camera::FitBounds { bounds, padding },
            None => Camera::Center {
                center: DEFAULT_CENTER,
                zoom: DEFAULT_ZOOM,
            },
        };

        Self { layers, camera }
    }

    pub fn layer(&self, role: LayerRole) -> Option<&Layer> {
        self.layers.iter().find(|layer| layer.id.role == role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Destination;
    use crate::position::Location;
    use crate::routing::Route;

    fn location() -> Location {
        Location::live(20.6597, -103.3496, Some(10.0))
    }

    fn destination() -> Destination {
        Destination::new("poi.1", "Parking", Coordinate::new(20.689791, -103.417812))
    }

    fn route() -> Route {
        Route {
            geometry: vec![
                Coordinate::new(20.6597, -103.3496),
                Coordinate::new(20.70, -103.43),
                Coordinate::new(20.689791, -103.417812),
            ],
            distance_meters: 5000.0,
            duration_seconds: 600.0,
            steps: Vec::new(),
        }
    }

    #[test]
    fn test_empty_state_centers_default() {
        let plan = RenderPlan::from_state(&NavigationState::default());

        assert!(plan.layers.is_empty());
        assert_eq!(
            plan.camera,
            Camera::Center {
                center: DEFAULT_CENTER,
                zoom: 13.0
            }
        );
    }

    #[test]
    fn test_origin_only() {
        let state = NavigationState {
            location: Some(location()),
            ..Default::default()
        };
        let plan = RenderPlan::from_state(&state);

        assert_eq!(plan.layers.len(), 1);
        assert_eq!(plan.layers[0].id.name(), "origin-circle");
        assert!(matches!(plan.camera, Camera::FitBounds { padding: 50, .. }));
    }

    #[test]
    fn test_hidden_pin_draws_no_destination() {
        let state = NavigationState {
            destination: Some(destination()),
            show_destination_pin: false,
            ..Default::default()
        };
        let plan = RenderPlan::from_state(&state);

        assert!(plan.layer(LayerRole::Destination).is_none());
    }

    #[test]
    fn test_empty_route_keeps_pin_without_line() {
        let state = NavigationState {
            location: Some(location()),
            destination: Some(destination()),
            route: Some(RouteOutcome::Empty),
            show_destination_pin: true,
            test_mode_active: false,
        };
        let plan = RenderPlan::from_state(&state);

        assert!(plan.layer(LayerRole::Destination).is_some());
        assert!(plan.layer(LayerRole::Route).is_none());
    }

    #[test]
    fn test_route_bounds_cover_all_points() {
        let state = NavigationState {
            location: Some(location()),
            destination: Some(destination()),
            route: Some(RouteOutcome::Found(route())),
            show_destination_pin: true,
            test_mode_active: false,
        };
        let plan = RenderPlan::from_state(&state);

        assert_eq!(plan.layers.len(), 3);
        let Camera::FitBounds { bounds, padding } = plan.camera else {
            panic!("expected fit bounds");
        };
        assert_eq!(padding, LIVE_PADDING);
        assert!(bounds.contains(Coordinate::new(20.70, -103.43)));
        assert!(bounds.contains(Coordinate::new(20.6597, -103.3496)));
    }

    #[test]
    fn test_test_mode_uses_test_layers_only() {
        let state = NavigationState {
            location: Some(location()),
            destination: Some(destination()),
            route: Some(RouteOutcome::Found(route())),
            show_destination_pin: true,
            test_mode_active: true,
        };
        let plan = RenderPlan::from_state(&state);

        assert!(plan
            .layers
            .iter()
            .all(|layer| layer.id.variant == LayerVariant::Test));
        assert_eq!(plan.layer(LayerRole::Route).unwrap().id.name(), "test-route");
        assert_eq!(
            plan.layer(LayerRole::Origin).unwrap().style,
            LayerStyle::Marker(style::TEST_ORIGIN)
        );
        assert!(matches!(plan.camera, Camera::FitBounds { padding: 80, .. }));
    }
}
