//! Search Box API client.
//!
//! # URL Patterns
//!
//! - `{base}/suggest?q=..&access_token=..&session_token=..&types=poi,address&limit=8&language=es[&proximity=lon,lat]`
//! - `{base}/retrieve/{id}?access_token=..&session_token=..`

use std::future::Future;

use tracing::debug;

use super::error::SearchError;
use super::session::SessionToken;
use super::types::{RetrieveResponse, SearchCandidate, SuggestResponse};
use crate::geo::Coordinate;
use crate::http::{build_url, build_url_with_path, AsyncHttpClient};

/// Base URL for the Mapbox Search Box API.
pub const DEFAULT_SEARCH_URL: &str = "https://api.mapbox.com/search/searchbox/v1";

/// Place types requested from suggest.
pub const DEFAULT_TYPES: &str = "poi,address";

/// Maximum suggestions per query.
pub const DEFAULT_LIMIT: u32 = 8;

/// Raw place search service.
pub trait PlaceSearch: Send + Sync {
    /// False when credentials are missing; callers skip the network entirely.
    fn is_configured(&self) -> bool;

    fn suggest(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
        session: &SessionToken,
    ) -> impl Future<Output = Result<Vec<SearchCandidate>, SearchError>> + Send;

    fn retrieve(
        &self,
        id: &str,
        session: &SessionToken,
    ) -> impl Future<Output = Result<SearchCandidate, SearchError>> + Send;
}

/// Settings for [`MapboxSearchBox`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    pub base_url: String,
    pub access_token: String,
    pub types: String,
    pub limit: u32,
    pub language: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_SEARCH_URL.to_string(),
            access_token: String::new(),
            types: DEFAULT_TYPES.to_string(),
            limit: DEFAULT_LIMIT,
            language: crate::routing::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Mapbox Search Box client.
pub struct MapboxSearchBox<C: AsyncHttpClient> {
    http_client: C,
    config: SearchConfig,
}

impl<C: AsyncHttpClient> MapboxSearchBox<C> {
    pub fn new(http_client: C, config: SearchConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    fn base(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    fn suggest_url(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
        session: &SessionToken,
    ) -> Result<String, SearchError> {
        let limit = self.config.limit.to_string();
        let proximity = proximity.map(|p| format!("{},{}", p.longitude, p.latitude));

        let mut params = vec![
            ("q", query),
            ("access_token", self.config.access_token.as_str()),
            ("session_token", session.as_str()),
            ("types", self.config.types.as_str()),
            ("limit", limit.as_str()),
            ("language", self.config.language.as_str()),
        ];
        if let Some(proximity) = proximity.as_deref() {
            params.push(("proximity", proximity));
        }

        Ok(build_url(&format!("{}/suggest", self.base()), &params)?)
    }

    fn retrieve_url(&self, id: &str, session: &SessionToken) -> Result<String, SearchError> {
        Ok(build_url_with_path(
            self.base(),
            &["retrieve", id],
            &[
                ("access_token", self.config.access_token.as_str()),
                ("session_token", session.as_str()),
            ],
        )?)
    }
}

impl<C: AsyncHttpClient> PlaceSearch for MapboxSearchBox<C> {
    fn is_configured(&self) -> bool {
        !self.config.access_token.is_empty()
    }

    async fn suggest(
        &self,
        query: &str,
        proximity: Option<Coordinate>,
        session: &SessionToken,
    ) -> Result<Vec<SearchCandidate>, SearchError> {
        let url = self.suggest_url(query, proximity, session)?;
        let body = self.http_client.get(&url).await?;

        let response: SuggestResponse = serde_json::from_slice(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        debug!(
            query,
            suggestions = response.suggestions.len(),
            "Search suggestions received"
        );

        Ok(response
            .suggestions
            .into_iter()
            .map(SearchCandidate::from)
            .collect())
    }

    async fn retrieve(
        &self,
        id: &str,
        session: &SessionToken,
    ) -> Result<SearchCandidate, SearchError> {
        let url = self.retrieve_url(id, session)?;
        let body = self.http_client.get(&url).await.map_err(|e| {
            if e.is_not_found() {
                SearchError::NotFound(id.to_string())
            } else {
                SearchError::Service(e)
            }
        })?;

        let response: RetrieveResponse = serde_json::from_slice(&body)
            .map_err(|e| SearchError::InvalidResponse(e.to_string()))?;

        response
            .features
            .into_iter()
            .next()
            .map(SearchCandidate::from)
            .ok_or_else(|| SearchError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::tests::MockAsyncHttpClient;
    use crate::http::HttpError;

    const SUGGEST_RESPONSE: &str = r#"{
        "suggestions": [
            {"name": "Estacionamiento Centro", "mapbox_id": "poi.1", "feature_type": "poi",
             "full_address": "Av. Juárez 100, Guadalajara", "place_formatted": "Guadalajara, Jalisco"},
            {"name": "Calle Hidalgo 200", "mapbox_id": "addr.2", "feature_type": "address",
             "place_formatted": "Zapopan, Jalisco"}
        ],
        "attribution": "© 2024 Mapbox"
    }"#;

    const RETRIEVE_RESPONSE: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-103.35, 20.67]},
            "properties": {
                "name": "Estacionamiento Centro", "mapbox_id": "poi.1",
                "coordinates": {"latitude": 20.6701, "longitude": -103.3502}
            }
        }]
    }"#;

    fn search_box(client: MockAsyncHttpClient) -> MapboxSearchBox<MockAsyncHttpClient> {
        MapboxSearchBox::new(
            client,
            SearchConfig {
                access_token: "pk.test".to_string(),
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_suggest_parses_candidates() {
        let search = search_box(MockAsyncHttpClient::with_json(SUGGEST_RESPONSE));

        let candidates = search
            .suggest("estacionamiento", None, &SessionToken::new())
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].id, "poi.1");
        assert_eq!(candidates[1].address, "");
        assert!(candidates.iter().all(|c| c.coordinates.is_none()));
    }

    #[tokio::test]
    async fn test_suggest_url_params() {
        let client = MockAsyncHttpClient::with_json(SUGGEST_RESPONSE);
        let search = search_box(client.clone());
        let session = SessionToken::new();

        search
            .suggest(
                "plaza del sol",
                Some(Coordinate::new(20.6597, -103.3496)),
                &session,
            )
            .await
            .unwrap();

        let url = &client.requests()[0];
        assert!(url.starts_with("https://api.mapbox.com/search/searchbox/v1/suggest?"));
        assert!(url.contains("q=plaza+del+sol"));
        assert!(url.contains(&format!("session_token={}", session)));
        assert!(url.contains("types=poi%2Caddress"));
        assert!(url.contains("limit=8"));
        assert!(url.contains("language=es"));
        assert!(url.contains("proximity=-103.3496%2C20.6597"));
    }

    #[tokio::test]
    async fn test_retrieve_fills_coordinates() {
        let client = MockAsyncHttpClient::with_json(RETRIEVE_RESPONSE);
        let search = search_box(client.clone());

        let candidate = search.retrieve("poi.1", &SessionToken::new()).await.unwrap();

        assert_eq!(candidate.coordinates, Some(Coordinate::new(20.6701, -103.3502)));
        assert!(client.requests()[0].contains("/retrieve/poi.1?"));
    }

    #[tokio::test]
    async fn test_retrieve_escapes_id() {
        let client = MockAsyncHttpClient::with_json(RETRIEVE_RESPONSE);
        let search = search_box(client.clone());

        search
            .retrieve("dXJuOm1ieHBvaQ/x?y#z", &SessionToken::new())
            .await
            .unwrap();

        let url = &client.requests()[0];
        assert!(url.starts_with(
            "https://api.mapbox.com/search/searchbox/v1/retrieve/dXJuOm1ieHBvaQ%2Fx%3Fy%23z?"
        ));
        assert!(url.contains("access_token="));
    }

    #[tokio::test]
    async fn test_retrieve_404_is_not_found() {
        let search = search_box(MockAsyncHttpClient::failing(HttpError::Status {
            status: 404,
            url: "https://api.mapbox.com/search/searchbox/v1/retrieve/x".to_string(),
        }));

        let err = search.retrieve("x", &SessionToken::new()).await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("x".to_string()));
    }

    #[tokio::test]
    async fn test_retrieve_empty_collection_is_not_found() {
        let search = search_box(MockAsyncHttpClient::with_json(r#"{"features": []}"#));

        let err = search.retrieve("gone", &SessionToken::new()).await.unwrap_err();
        assert_eq!(err, SearchError::NotFound("gone".to_string()));
    }
}
