use crate::error::ValidationError;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

pub fn is_valid_latitude(latitude: f64) -> bool {
    (-90.0..=90.0).contains(&latitude)
}

pub fn is_valid_longitude(longitude: f64) -> bool {
    (-180.0..=180.0).contains(&longitude)
}

/// A validated coordinate pair. The only way to obtain one is through
/// [`GeoPoint::try_from_lat_lon`], so every `GeoPoint` in the system is
/// known to be in range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    point: geo::Point,
}

impl GeoPoint {
    pub fn try_from_lat_lon(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        if !is_valid_latitude(latitude) {
            return Err(ValidationError::LatitudeOutOfRange { value: latitude });
        }

        if !is_valid_longitude(longitude) {
            return Err(ValidationError::LongitudeOutOfRange { value: longitude });
        }

        Ok(GeoPoint {
            point: geo::Point::new(longitude, latitude),
        })
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    /// Great-circle distance in kilometers, haversine formula.
    pub fn haversine_distance_km(&self, to: &GeoPoint) -> f64 {
        let phi1 = self.lat().to_radians();
        let phi2 = to.lat().to_radians();

        let delta_phi = (to.lat() - self.lat()).to_radians();
        let delta_lambda = (to.lon() - self.lon()).to_radians();

        let a = (delta_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_KM * c
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat(), self.lon())
    }
}

impl From<&GeoPoint> for geo::Point<f64> {
    fn from(value: &GeoPoint) -> Self {
        value.point
    }
}

impl From<&GeoPoint> for geo::Coord<f64> {
    fn from(value: &GeoPoint) -> Self {
        geo::Coord {
            x: value.lon(),
            y: value.lat(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ValidationError, test_utils};

    use super::{GeoPoint, is_valid_latitude, is_valid_longitude};

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert_eq!(
            GeoPoint::try_from_lat_lon(90.5, 0.0),
            Err(ValidationError::LatitudeOutOfRange { value: 90.5 })
        );
        assert_eq!(
            GeoPoint::try_from_lat_lon(0.0, -180.2),
            Err(ValidationError::LongitudeOutOfRange { value: -180.2 })
        );

        assert!(is_valid_latitude(-90.0));
        assert!(is_valid_latitude(90.0));
        assert!(!is_valid_latitude(f64::NAN));
        assert!(is_valid_longitude(180.0));
        assert!(!is_valid_longitude(180.0001));
    }

    #[test]
    fn test_distance_to_self_is_zero() {
        let nairobi = test_utils::point(-1.2921, 36.8219);

        assert_eq!(nairobi.haversine_distance_km(&nairobi), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = test_utils::point(-1.2921, 36.8219);
        let b = test_utils::point(12.5, -7.25);

        let forward = a.haversine_distance_km(&b);
        let backward = b.haversine_distance_km(&a);

        assert!((forward - backward).abs() < 1e-9);
    }

    #[test]
    fn test_nairobi_to_mombasa() {
        let nairobi = test_utils::point(-1.2921, 36.8219);
        let mombasa = test_utils::point(-4.0435, 39.6682);

        let distance = nairobi.haversine_distance_km(&mombasa);

        assert!((distance - 440.0).abs() < 5.0, "got {distance} km");
    }

    #[test]
    fn test_meridian_offset_measures_back_exactly() {
        let origin = test_utils::point(0.0, 0.0);
        let north = test_utils::offset_km(&origin, 25.0, 0.0);

        let distance = origin.haversine_distance_km(&north);

        assert!((distance - 25.0).abs() < 1e-6, "got {distance} km");
    }

    #[test]
    fn test_geo_conversions_keep_axis_order() {
        let point = test_utils::point(-1.5, 36.75);

        let geo_point: geo::Point = (&point).into();
        let coord: geo::Coord = (&point).into();

        assert_eq!(geo_point.x(), 36.75);
        assert_eq!(geo_point.y(), -1.5);
        assert_eq!(coord.x, 36.75);
        assert_eq!(coord.y, -1.5);
    }
}
