use tracing::debug;

use crate::{
    error::ValidationError,
    geometry::point::GeoPoint,
    ids::ZoneId,
    zone::zone::{RADIUS_MIN_KM, Zone, check_radius_km},
};

/// How much of the minimum slack a suggested radius keeps for itself.
const SUGGESTION_HEADROOM: f64 = 0.9;

/// Geometry for a zone that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCandidate {
    pub center: GeoPoint,
    pub radius_km: f64,
}

/// Derived overlap record between a candidate and one existing zone.
/// Computed on demand, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneOverlap {
    zone_id: ZoneId,
    center_distance_km: f64,
    overlaps: bool,
    overlap_distance_km: f64,
    overlap_percentage: i64,
}

impl ZoneOverlap {
    pub fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    pub fn center_distance_km(&self) -> f64 {
        self.center_distance_km
    }

    pub fn overlaps(&self) -> bool {
        self.overlaps
    }

    pub fn overlap_distance_km(&self) -> f64 {
        self.overlap_distance_km
    }

    pub fn overlap_percentage(&self) -> i64 {
        self.overlap_percentage
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryValidation {
    overlaps: Vec<ZoneOverlap>,
    suggested_radius_km: Option<f64>,
}

impl BoundaryValidation {
    pub fn is_valid(&self) -> bool {
        self.overlaps.is_empty()
    }

    /// The zones the candidate collides with, in input order.
    pub fn overlaps(&self) -> &[ZoneOverlap] {
        &self.overlaps
    }

    /// Advisory only. The engine never shrinks a zone on its own.
    pub fn suggested_radius_km(&self) -> Option<f64> {
        self.suggested_radius_km
    }
}

/// Two circles collide iff their centers sit closer than the sum of
/// their radii.
pub fn overlap_between(candidate: &ZoneCandidate, zone: &Zone) -> ZoneOverlap {
    let center_distance_km = candidate.center.haversine_distance_km(&zone.center());
    let combined_radius_km = candidate.radius_km + zone.radius_km();
    let overlaps = center_distance_km < combined_radius_km;

    let overlap_distance_km = if overlaps {
        combined_radius_km - center_distance_km
    } else {
        0.0
    };
    let overlap_percentage = if overlaps {
        (overlap_distance_km / candidate.radius_km * 100.0).round() as i64
    } else {
        0
    };

    ZoneOverlap {
        zone_id: zone.id(),
        center_distance_km,
        overlaps,
        overlap_distance_km,
        overlap_percentage,
    }
}

/// Validate a candidate zone against every existing zone of the owner.
/// Pure function: nothing is persisted here, the caller decides what to
/// do with the verdict.
pub fn validate_new_zone(
    candidate: &ZoneCandidate,
    existing: &[Zone],
) -> Result<BoundaryValidation, ValidationError> {
    check_radius_km(candidate.radius_km)?;

    let overlaps: Vec<ZoneOverlap> = existing
        .iter()
        .map(|zone| overlap_between(candidate, zone))
        .filter(ZoneOverlap::overlaps)
        .collect();

    let suggested_radius_km = if overlaps.is_empty() {
        None
    } else {
        existing
            .iter()
            .map(|zone| {
                candidate.center.haversine_distance_km(&zone.center()) - zone.radius_km()
            })
            .min_by(|a, b| a.total_cmp(b))
            .map(|slack| (SUGGESTION_HEADROOM * slack).max(RADIUS_MIN_KM))
    };

    debug!(
        existing = existing.len(),
        overlapping = overlaps.len(),
        "zone boundary check"
    );

    Ok(BoundaryValidation {
        overlaps,
        suggested_radius_km,
    })
}
