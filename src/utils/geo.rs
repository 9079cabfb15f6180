use crate::error::{AppError, AppResult};

/// Spatial reference of every stored point (WGS 84)
pub const SRID_WGS84: i32 = 4326;

/// Mean earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS 84 point in x/y (longitude/latitude) axis order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub x: f64,
    pub y: f64,
    pub srid: i32,
}

impl GeoPoint {
    /// Builds a point from longitude and latitude, rejecting non-finite
    /// or out-of-range coordinates.
    pub fn from_lng_lat(longitude: f64, latitude: f64) -> AppResult<Self> {
        validate_coordinates(latitude, longitude)?;
        Ok(Self {
            x: longitude,
            y: latitude,
            srid: SRID_WGS84,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.x
    }

    pub fn latitude(&self) -> f64 {
        self.y
    }

    /// Great-circle distance to another point in meters
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        haversine_distance(self.y, self.x, other.y, other.x)
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> AppResult<()> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(AppError::BadRequest(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(AppError::BadRequest(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::BadRequest(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

/// Calculate distance between two coordinates using Haversine formula
/// Returns distance in meters
pub fn haversine_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();

    EARTH_RADIUS_M * c
}

/// Latitude/longitude window enclosing a search circle.
///
/// `lng` is `None` when the circle reaches a pole or wraps the
/// antimeridian; callers then filter on latitude alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub lat: (f64, f64),
    pub lng: Option<(f64, f64)>,
}

pub fn bounding_box(center: &GeoPoint, radius_m: f64) -> BoundingBox {
    let angular = radius_m / EARTH_RADIUS_M;
    let lat_rad = center.y.to_radians();
    let min_lat = lat_rad - angular;
    let max_lat = lat_rad + angular;

    let half_pi = std::f64::consts::FRAC_PI_2;
    if min_lat <= -half_pi || max_lat >= half_pi {
        return BoundingBox {
            lat: (
                min_lat.max(-half_pi).to_degrees(),
                max_lat.min(half_pi).to_degrees(),
            ),
            lng: None,
        };
    }

    let delta_lng = (angular.sin() / lat_rad.cos()).asin();
    let min_lng = center.x.to_radians() - delta_lng;
    let max_lng = center.x.to_radians() + delta_lng;
    let pi = std::f64::consts::PI;

    let lng = if min_lng < -pi || max_lng > pi {
        None
    } else {
        Some((min_lng.to_degrees(), max_lng.to_degrees()))
    };

    BoundingBox {
        lat: (min_lat.to_degrees(), max_lat.to_degrees()),
        lng,
    }
}
