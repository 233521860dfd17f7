use crate::models::Coordinates;

/// Mean Earth radius in kilometers (spherical approximation).
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two positions in kilometers, using
/// the haversine formula. Total over valid latitude/longitude and
/// symmetric in its arguments; callers verify both endpoints exist
/// before calling.
#[inline]
pub fn haversine_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Axis-aligned lat/lon box used to push a cheap geospatial pre-filter
/// down into the profile-service candidate query.
#[derive(Debug, Clone, Copy)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

/// Box of roughly `radius_km` around `center`. 1 degree of latitude is
/// about 111 km; a degree of longitude shrinks with cos(latitude).
pub fn bounding_box(center: &Coordinates, radius_km: f64) -> BoundingBox {
    let lat_delta = radius_km / 111.0;
    let lon_delta = radius_km / (111.0 * center.latitude.to_radians().cos().abs().max(1e-6));

    BoundingBox {
        min_lat: center.latitude - lat_delta,
        max_lat: center.latitude + lat_delta,
        min_lon: center.longitude - lon_delta,
        max_lon: center.longitude + lon_delta,
    }
}
