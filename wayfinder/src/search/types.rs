//! Search candidate types and the search service wire format.

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Administrative context of a place.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaceContext {
    pub country: Option<String>,
    pub region: Option<String>,
    pub place: Option<String>,
}

/// A place returned by search.
///
/// Suggestions may come without coordinates; retrieving the candidate by
/// id fills them in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCandidate {
    pub id: String,
    pub name: String,
    /// Full street address, empty when the provider has none.
    pub address: String,
    /// Locality line ("Guadalajara, Jalisco, México").
    pub place_formatted: String,
    pub coordinates: Option<Coordinate>,
    pub category: Option<String>,
    pub context: Option<PlaceContext>,
}

impl SearchCandidate {
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// One-line label for lists.
    pub fn label(&self) -> String {
        match (self.address.is_empty(), self.place_formatted.is_empty()) {
            (false, _) => format!("{}, {}", self.name, self.address),
            (true, false) => format!("{}, {}", self.name, self.place_formatted),
            (true, true) => self.name.clone(),
        }
    }
}

/// Results of one completed search, tagged with the query that produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResults {
    pub query: String,
    pub candidates: Vec<SearchCandidate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SuggestResponse {
    #[serde(default)]
    pub suggestions: Vec<WirePlace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RetrieveResponse {
    #[serde(default)]
    pub features: Vec<WireFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireFeature {
    #[serde(default)]
    pub geometry: Option<WirePoint>,
    pub properties: WirePlace,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePoint {
    /// `[lon, lat]`.
    pub coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlace {
    #[serde(default)]
    pub mapbox_id: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub place_formatted: Option<String>,
    #[serde(default)]
    pub coordinates: Option<WireCoordinates>,
    #[serde(default)]
    pub context: Option<WireContext>,
    #[serde(default)]
    pub poi_category: Vec<String>,
    #[serde(default)]
    pub feature_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCoordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireContext {
    #[serde(default)]
    pub country: Option<WireNamed>,
    #[serde(default)]
    pub region: Option<WireNamed>,
    #[serde(default)]
    pub place: Option<WireNamed>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireNamed {
    pub name: String,
}

impl From<WirePlace> for SearchCandidate {
    fn from(wire: WirePlace) -> Self {
        Self {
            id: wire.mapbox_id.or(wire.id).unwrap_or_default(),
            name: wire.name,
            address: wire.full_address.or(wire.address).unwrap_or_default(),
            place_formatted: wire.place_formatted.unwrap_or_default(),
            coordinates: wire
                .coordinates
                .map(|c| Coordinate::new(c.latitude, c.longitude)),
            category: wire.poi_category.into_iter().next().or(wire.feature_type),
            context: wire.context.map(|ctx| PlaceContext {
                country: ctx.country.map(|n| n.name),
                region: ctx.region.map(|n| n.name),
                place: ctx.place.map(|n| n.name),
            }),
        }
    }
}

impl From<WireFeature> for SearchCandidate {
    fn from(feature: WireFeature) -> Self {
        let point = feature.geometry.map(|g| Coordinate::from_lon_lat(g.coordinates));
        let mut candidate = SearchCandidate::from(feature.properties);
        if candidate.coordinates.is_none() {
            candidate.coordinates = point;
        }
        candidate
    }
}
