use crate::{
    error::ValidationError,
    geometry::point::GeoPoint,
    ids::{OwnerId, ZoneId},
};

pub const RADIUS_MIN_KM: f64 = 0.1;
pub const RADIUS_MAX_KM: f64 = 100.0;

pub fn check_radius_km(radius_km: f64) -> Result<(), ValidationError> {
    if !(RADIUS_MIN_KM..=RADIUS_MAX_KM).contains(&radius_km) {
        return Err(ValidationError::RadiusOutOfRange { radius_km });
    }

    Ok(())
}

/// A circular collection area owned by a supervisor. Zones are snapshots:
/// updates return a new value for the caller to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    id: ZoneId,
    name: String,
    center: GeoPoint,
    radius_km: f64,
    owner_id: OwnerId,
    produce_type: Option<String>,
    comments: Option<String>,
}

impl Zone {
    pub fn new(
        id: ZoneId,
        name: impl Into<String>,
        center: GeoPoint,
        radius_km: f64,
        owner_id: OwnerId,
    ) -> Result<Self, ValidationError> {
        check_radius_km(radius_km)?;

        Ok(Zone {
            id,
            name: name.into(),
            center,
            radius_km,
            owner_id,
            produce_type: None,
            comments: None,
        })
    }

    pub fn id(&self) -> ZoneId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn produce_type(&self) -> Option<&str> {
        self.produce_type.as_deref()
    }

    pub fn comments(&self) -> Option<&str> {
        self.comments.as_deref()
    }

    pub fn with_produce_type(&self, produce_type: Option<String>) -> Zone {
        Zone {
            produce_type,
            ..self.clone()
        }
    }

    pub fn with_comments(&self, comments: Option<String>) -> Zone {
        Zone {
            comments,
            ..self.clone()
        }
    }

    /// Radius updates revalidate the bounds.
    pub fn with_radius_km(&self, radius_km: f64) -> Result<Zone, ValidationError> {
        check_radius_km(radius_km)?;

        Ok(Zone {
            radius_km,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ValidationError, test_utils};

    #[test]
    fn test_radius_bounds_are_enforced() {
        let center = test_utils::point(0.0, 0.0);

        let too_small = test_utils::try_zone(1, center, 0.05);
        assert_eq!(
            too_small,
            Err(ValidationError::RadiusOutOfRange { radius_km: 0.05 })
        );

        let too_large = test_utils::try_zone(1, center, 100.5);
        assert_eq!(
            too_large,
            Err(ValidationError::RadiusOutOfRange { radius_km: 100.5 })
        );

        assert!(test_utils::try_zone(1, center, 0.1).is_ok());
        assert!(test_utils::try_zone(1, center, 100.0).is_ok());
    }

    #[test]
    fn test_updates_produce_new_snapshots() {
        let zone = test_utils::zone(1, test_utils::point(0.0, 0.0), 10.0);

        let renamed = zone.with_comments(Some("north gate".to_owned()));
        assert_eq!(zone.comments(), None);
        assert_eq!(renamed.comments(), Some("north gate"));

        let widened = zone.with_radius_km(12.5).unwrap();
        assert_eq!(zone.radius_km(), 10.0);
        assert_eq!(widened.radius_km(), 12.5);

        assert_eq!(
            zone.with_radius_km(0.0),
            Err(ValidationError::RadiusOutOfRange { radius_km: 0.0 })
        );

        let labelled = zone.with_produce_type(Some("avocado".to_owned()));
        assert_eq!(labelled.produce_type(), Some("avocado"));
    }
}
