use crate::{
    error::ValidationError,
    geometry::point::{GeoPoint, is_valid_latitude, is_valid_longitude},
};

pub const DEFAULT_MAX_DECIMAL_PLACES: u32 = 6;

/// Slack for binary representation error when deciding whether a value
/// fits in a given number of decimal places.
const PRECISION_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFault {
    LatitudeOutOfRange,
    LongitudeOutOfRange,
    PrecisionExceeded,
}

/// Outcome of checking one raw coordinate pair. Each check is reported
/// independently so the caller can tell the user which input to fix.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateCheck {
    latitude: f64,
    longitude: f64,
    latitude_valid: bool,
    longitude_valid: bool,
    precision_valid: bool,
    max_decimal_places: u32,
    formatted: Option<GeoPoint>,
}

impl CoordinateCheck {
    pub fn is_valid(&self) -> bool {
        self.latitude_valid && self.longitude_valid && self.precision_valid
    }

    pub fn latitude_valid(&self) -> bool {
        self.latitude_valid
    }

    pub fn longitude_valid(&self) -> bool {
        self.longitude_valid
    }

    pub fn precision_valid(&self) -> bool {
        self.precision_valid
    }

    /// The coordinates rounded to the precision limit. Present iff both
    /// range checks pass.
    pub fn formatted(&self) -> Option<GeoPoint> {
        self.formatted
    }

    pub fn faults(&self) -> Vec<CoordinateFault> {
        let mut faults = Vec::new();

        if !self.latitude_valid {
            faults.push(CoordinateFault::LatitudeOutOfRange);
        }
        if !self.longitude_valid {
            faults.push(CoordinateFault::LongitudeOutOfRange);
        }
        if !self.precision_valid {
            faults.push(CoordinateFault::PrecisionExceeded);
        }

        faults
    }

    /// Collapse the check into the rounded point or the first violated
    /// check as a typed error.
    pub fn into_result(self) -> Result<GeoPoint, ValidationError> {
        if !self.latitude_valid {
            return Err(ValidationError::LatitudeOutOfRange {
                value: self.latitude,
            });
        }

        if !self.longitude_valid {
            return Err(ValidationError::LongitudeOutOfRange {
                value: self.longitude,
            });
        }

        if !self.precision_valid {
            return Err(ValidationError::PrecisionExceeded {
                max_decimal_places: self.max_decimal_places,
            });
        }

        GeoPoint::try_from_lat_lon(
            round_to(self.latitude, self.max_decimal_places),
            round_to(self.longitude, self.max_decimal_places),
        )
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> CoordinateCheck {
    validate_coordinates_with_precision(latitude, longitude, DEFAULT_MAX_DECIMAL_PLACES)
}

pub fn validate_coordinates_with_precision(
    latitude: f64,
    longitude: f64,
    max_decimal_places: u32,
) -> CoordinateCheck {
    let latitude_valid = is_valid_latitude(latitude);
    let longitude_valid = is_valid_longitude(longitude);
    let precision_valid = within_precision(latitude, max_decimal_places)
        && within_precision(longitude, max_decimal_places);

    let formatted = if latitude_valid && longitude_valid {
        GeoPoint::try_from_lat_lon(
            round_to(latitude, max_decimal_places),
            round_to(longitude, max_decimal_places),
        )
        .ok()
    } else {
        None
    };

    CoordinateCheck {
        latitude,
        longitude,
        latitude_valid,
        longitude_valid,
        precision_valid,
        max_decimal_places,
        formatted,
    }
}

fn round_to(value: f64, decimal_places: u32) -> f64 {
    let factor = 10f64.powi(decimal_places as i32);
    (value * factor).round() / factor
}

fn within_precision(value: f64, decimal_places: u32) -> bool {
    let scaled = value * 10f64.powi(decimal_places as i32);
    (scaled - scaled.round()).abs() < PRECISION_EPSILON
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;

    use super::{
        CoordinateFault, validate_coordinates, validate_coordinates_with_precision,
    };

    #[test]
    fn test_valid_coordinates_pass_all_checks() {
        let check = validate_coordinates(-1.2921, 36.8219);

        assert!(check.is_valid());
        assert!(check.latitude_valid());
        assert!(check.longitude_valid());
        assert!(check.precision_valid());
        assert!(check.faults().is_empty());

        let formatted = check.formatted().unwrap();
        assert_eq!(formatted.lat(), -1.2921);
        assert_eq!(formatted.lon(), 36.8219);
    }

    #[test]
    fn test_reports_the_failing_check() {
        let check = validate_coordinates(95.0, 36.8219);

        assert!(!check.is_valid());
        assert!(!check.latitude_valid());
        assert!(check.longitude_valid());
        assert_eq!(check.faults(), vec![CoordinateFault::LatitudeOutOfRange]);
        assert_eq!(check.formatted(), None);
        assert_eq!(
            check.into_result(),
            Err(ValidationError::LatitudeOutOfRange { value: 95.0 })
        );
    }

    #[test]
    fn test_excess_precision_fails_closed() {
        let check = validate_coordinates(-1.29215437, 36.8219);

        assert!(!check.is_valid());
        assert!(check.latitude_valid());
        assert!(!check.precision_valid());
        assert_eq!(check.faults(), vec![CoordinateFault::PrecisionExceeded]);

        // the rounded point is still offered for display purposes
        let formatted = check.formatted().unwrap();
        assert_eq!(formatted.lat(), -1.292154);
    }

    #[test]
    fn test_custom_precision_limit() {
        let check = validate_coordinates_with_precision(-1.29, 36.82, 2);
        assert!(check.is_valid());

        let check = validate_coordinates_with_precision(-1.291, 36.82, 2);
        assert!(!check.is_valid());
        assert_eq!(
            check.into_result(),
            Err(ValidationError::PrecisionExceeded {
                max_decimal_places: 2
            })
        );
    }
}
