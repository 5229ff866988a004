//! Geographic primitives shared by every navigation component.
//!
//! Provides the [`Coordinate`] point type, [`Bounds`] used to fit the map
//! camera, and great-circle distance.

mod types;

pub use types::{Bounds, CoordError, Coordinate, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two points in kilometers (haversine).
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let d_lat = (to.latitude - from.latitude).to_radians();
    let d_lon = (to.longitude - from.longitude).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.latitude.to_radians().cos()
            * to.latitude.to_radians().cos()
            * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
