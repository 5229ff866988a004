//! Directions API client.
//!
//! # URL Pattern
//!
//! `{base}/{profile}/{lon1},{lat1};{lon2},{lat2}?access_token=..&geometries=geojson&steps=true&...`
//!
//! Only the first route of a response is used; the provider's order is
//! trusted as-is.

use std::future::Future;

use tracing::{debug, info, warn};

use super::error::RouteError;
use super::types::{DirectionsResponse, Route, RouteOutcome, RoutingProfile};
use crate::geo::Coordinate;
use crate::http::{build_url, AsyncHttpClient};

/// Base URL for the Mapbox Directions API.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox";

/// Language for maneuver instructions.
pub const DEFAULT_LANGUAGE: &str = "es";

/// Source of routes between two coordinates.
///
/// Implementations never fail: any problem yields [`RouteOutcome::Empty`].
pub trait RouteFetcher: Send + Sync {
    fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> impl Future<Output = RouteOutcome> + Send;
}

/// Settings for [`MapboxDirections`].
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionsConfig {
    pub base_url: String,
    /// Empty means "not configured": requests are skipped.
    pub access_token: String,
    pub language: String,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DIRECTIONS_URL.to_string(),
            access_token: String::new(),
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Mapbox Directions route fetcher.
///
/// ```ignore
/// use wayfinder::http::AsyncReqwestClient;
/// use wayfinder::routing::{DirectionsConfig, MapboxDirections, RouteFetcher, RoutingProfile};
///
/// let client = AsyncReqwestClient::new()?;
/// let directions = MapboxDirections::new(client, DirectionsConfig { access_token, ..Default::default() });
/// let outcome = directions.fetch(origin, destination, RoutingProfile::Driving).await;
/// ```
pub struct MapboxDirections<C: AsyncHttpClient> {
    http_client: C,
    config: DirectionsConfig,
}

impl<C: AsyncHttpClient> MapboxDirections<C> {
    pub fn new(http_client: C, config: DirectionsConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn has_token(&self) -> bool {
        !self.config.access_token.is_empty()
    }

    fn request_url(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> Result<String, RouteError> {
        let path = format!(
            "{}/{}/{},{};{},{}",
            self.config.base_url.trim_end_matches('/'),
            profile,
            origin.longitude,
            origin.latitude,
            destination.longitude,
            destination.latitude
        );

        Ok(build_url(
            &path,
            &[
                ("access_token", self.config.access_token.as_str()),
                ("geometries", "geojson"),
                ("steps", "true"),
                ("voice_instructions", "true"),
                ("banner_instructions", "true"),
                ("language", self.config.language.as_str()),
            ],
        )?)
    }

    async fn request(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> Result<Route, RouteError> {
        let url = self.request_url(origin, destination, profile)?;
        let body = self.http_client.get(&url).await?;

        let response: DirectionsResponse = serde_json::from_slice(&body)
            .map_err(|e| RouteError::InvalidResponse(e.to_string()))?;

        if let Some(code) = response.code.as_deref() {
            if code != "Ok" {
                return Err(RouteError::Service {
                    code: code.to_string(),
                    message: response.message.unwrap_or_default(),
                });
            }
        }

        debug!(routes = response.routes.len(), "Directions response parsed");

        response
            .routes
            .into_iter()
            .next()
            .map(Route::from)
            .ok_or(RouteError::NoRoute)
    }
}

impl<C: AsyncHttpClient> RouteFetcher for MapboxDirections<C> {
    async fn fetch(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        profile: RoutingProfile,
    ) -> RouteOutcome {
        if !self.has_token() {
            warn!("No Mapbox access token configured, skipping route request");
            return RouteOutcome::Empty;
        }

        match self.request(origin, destination, profile).await {
            Ok(route) => {
                info!(
                    %profile,
                    distance_m = format!("{:.0}", route.distance_meters),
                    duration_s = format!("{:.0}", route.duration_seconds),
                    steps = route.steps.len(),
                    "Route found"
                );
                RouteOutcome::Found(route)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    %profile,
                    origin = %origin,
                    destination = %destination,
                    "Route request failed"
                );
                RouteOutcome::Empty
            }
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Route fetcher with a scripted outcome and optional delay.
    #[derive(Clone)]
    pub struct ScriptedFetcher {
        pub outcome: RouteOutcome,
        pub delay: Duration,
        calls: Arc<Mutex<Vec<(Coordinate, Coordinate, RoutingProfile)>>>,
    }

    impl ScriptedFetcher {
        pub fn new(outcome: RouteOutcome) -> Self {
            Self {
                outcome,
                delay: Duration::ZERO,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = delay;
            self
        }

        pub fn calls(&self) -> Vec<(Coordinate, Coordinate, RoutingProfile)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RouteFetcher for ScriptedFetcher {
        async fn fetch(
            &self,
            origin: Coordinate,
            destination: Coordinate,
            profile: RoutingProfile,
        ) -> RouteOutcome {
            self.calls.lock().unwrap().push((origin, destination, profile));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.outcome.clone()
        }
    }

    pub fn sample_route() -> Route {
        Route {
            geometry: vec![
                Coordinate::new(20.674289, -103.386854),
                Coordinate::new(20.689791, -103.417812),
            ],
            distance_meters: 4210.0,
            duration_seconds: 612.0,
            steps: Vec::new(),
        }
    }

    const SAMPLE_RESPONSE: &str = r#"{
        "routes": [
            {
                "geometry": {"type": "LineString", "coordinates": [[-103.386854, 20.674289], [-103.40, 20.68], [-103.417812, 20.689791]]},
                "legs": [{"summary": "", "steps": [
                    {"name": "Av. México", "duration": 120.0, "distance": 900.0,
                     "maneuver": {"type": "depart", "instruction": "Dirígete al oeste", "location": [-103.386854, 20.674289]}},
                    {"name": "", "duration": 0.0, "distance": 0.0,
                     "maneuver": {"type": "arrive", "instruction": "Has llegado", "location": [-103.417812, 20.689791]}}
                ]}],
                "duration": 612.4,
                "distance": 4210.7
            },
            {
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0]]},
                "legs": [],
                "duration": 1.0,
                "distance": 1.0
            }
        ],
        "waypoints": [],
        "code": "Ok",
        "uuid": "abc"
    }"#;

    fn config(token: &str) -> DirectionsConfig {
        DirectionsConfig {
            access_token: token.to_string(),
            ..Default::default()
        }
    }

    fn origin() -> Coordinate {
        Coordinate::new(20.674289, -103.386854)
    }

    fn destination() -> Coordinate {
        Coordinate::new(20.689791, -103.417812)
    }

    #[tokio::test]
    async fn test_fetch_parses_first_route() {
        let client = MockAsyncHttpClient::with_json(SAMPLE_RESPONSE);
        let directions = MapboxDirections::new(client, config("pk.test"));

        let outcome = directions
            .fetch(origin(), destination(), RoutingProfile::Driving)
            .await;

        let route = outcome.route().expect("route");
        assert_eq!(route.geometry.len(), 3);
        assert_eq!(route.distance_meters, 4210.7);
        assert_eq!(route.duration_seconds, 612.4);
        assert_eq!(route.steps.len(), 2);
        assert_eq!(route.steps[0].instruction, "Dirígete al oeste");
    }

    #[tokio::test]
    async fn test_request_url_shape() {
        let client = MockAsyncHttpClient::with_json(SAMPLE_RESPONSE);
        let directions = MapboxDirections::new(client.clone(), config("pk.test"));

        directions
            .fetch(origin(), destination(), RoutingProfile::Walking)
            .await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let url = &requests[0];
        assert!(url.starts_with(
            "https://api.mapbox.com/directions/v5/mapbox/walking/-103.386854,20.674289;-103.417812,20.689791?"
        ));
        assert!(url.contains("access_token=pk.test"));
        assert!(url.contains("geometries=geojson"));
        assert!(url.contains("steps=true"));
        assert!(url.contains("voice_instructions=true"));
        assert!(url.contains("banner_instructions=true"));
        assert!(url.contains("language=es"));
    }

    #[tokio::test]
    async fn test_missing_token_skips_network() {
        let client = MockAsyncHttpClient::with_json(SAMPLE_RESPONSE);
        let directions = MapboxDirections::new(client.clone(), config(""));

        let outcome = directions
            .fetch(origin(), destination(), RoutingProfile::Driving)
            .await;

        assert_eq!(outcome, RouteOutcome::Empty);
        assert!(client.requests().is_empty());
    }

    #[tokio::test]
    async fn test_service_error_is_empty() {
        let client = MockAsyncHttpClient::failing(HttpError::Status {
            status: 500,
            url: "https://api.mapbox.com/directions".to_string(),
        });
        let directions = MapboxDirections::new(client, config("pk.test"));

        let outcome = directions
            .fetch(origin(), destination(), RoutingProfile::Driving)
            .await;

        assert_eq!(outcome, RouteOutcome::Empty);
    }

    #[tokio::test]
    async fn test_error_code_is_empty() {
        let client = MockAsyncHttpClient::with_json(
            r#"{"code": "NoSegment", "message": "No road near coordinate", "routes": []}"#,
        );
        let directions = MapboxDirections::new(client, config("pk.test"));

        let err = directions
            .request(origin(), destination(), RoutingProfile::Driving)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            RouteError::Service {
                code: "NoSegment".to_string(),
                message: "No road near coordinate".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_zero_routes_is_empty() {
        let client = MockAsyncHttpClient::with_json(r#"{"code": "Ok", "routes": []}"#);
        let directions = MapboxDirections::new(client, config("pk.test"));

        let err = directions
            .request(origin(), destination(), RoutingProfile::Driving)
            .await
            .unwrap_err();
        assert_eq!(err, RouteError::NoRoute);
    }

    #[tokio::test]
    async fn test_garbage_body_is_empty() {
        let client = MockAsyncHttpClient::with_json("<html>oops</html>");
        let directions = MapboxDirections::new(client, config("pk.test"));

        let outcome = directions
            .fetch(origin(), destination(), RoutingProfile::Cycling)
            .await;
        assert_eq!(outcome, RouteOutcome::Empty);
    }
}
