use smallvec::SmallVec;
use tracing::debug;

use crate::{
    error::{NotFoundError, OptimalZoneError, ValidationError},
    geometry::point::GeoPoint,
    ids::ZoneId,
    zone::zone::Zone,
};

pub const MAX_ALTERNATIVES: usize = 3;

/// Containment verdict for one point against one zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneDistance {
    within_bounds: bool,
    distance_km: f64,
}

impl ZoneDistance {
    pub fn within_bounds(&self) -> bool {
        self.within_bounds
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }
}

pub fn resolve_membership(point: &GeoPoint, zone: &Zone) -> ZoneDistance {
    let distance_km = point.haversine_distance_km(&zone.center());

    ZoneDistance {
        within_bounds: distance_km <= zone.radius_km(),
        distance_km,
    }
}

/// One zone in the ranking produced by [`find_optimal_zone`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedZone {
    zone_id: ZoneId,
    distance_km: f64,
    within_bounds: bool,
}

impl RankedZone {
    pub fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    pub fn within_bounds(&self) -> bool {
        self.within_bounds
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimalZoneResult {
    best: RankedZone,
    alternatives: SmallVec<[RankedZone; MAX_ALTERNATIVES]>,
}

impl OptimalZoneResult {
    pub fn best(&self) -> &RankedZone {
        &self.best
    }

    /// False when no candidate zone actually contains the point and the
    /// globally nearest zone was returned instead.
    pub fn within_bounds(&self) -> bool {
        self.best.within_bounds
    }

    /// Up to [`MAX_ALTERNATIVES`] runner-up zones, nearest first.
    pub fn alternatives(&self) -> &[RankedZone] {
        &self.alternatives
    }
}

/// Rank the candidate zones for a farmer location. Prefers the nearest
/// zone that contains the point; falls back to the globally nearest zone
/// flagged as outside bounds. Equal distances break by zone id ascending
/// so results are reproducible.
pub fn find_optimal_zone(
    point: Option<GeoPoint>,
    candidates: &[Zone],
) -> Result<OptimalZoneResult, OptimalZoneError> {
    if candidates.is_empty() {
        return Err(NotFoundError::NoZonesAvailable.into());
    }

    let point = point.ok_or(ValidationError::LocationRequired)?;

    let mut ranked: Vec<RankedZone> = candidates
        .iter()
        .map(|zone| {
            let membership = resolve_membership(&point, zone);

            RankedZone {
                zone_id: zone.id(),
                distance_km: membership.distance_km(),
                within_bounds: membership.within_bounds(),
            }
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance_km
            .total_cmp(&b.distance_km)
            .then_with(|| a.zone_id.cmp(&b.zone_id))
    });

    let best_index = ranked
        .iter()
        .position(RankedZone::within_bounds)
        .unwrap_or(0);
    let best = ranked.remove(best_index);

    debug!(
        zone = %best.zone_id,
        distance_km = best.distance_km,
        within = best.within_bounds,
        "optimal zone resolved"
    );

    let alternatives = ranked.into_iter().take(MAX_ALTERNATIVES).collect();

    Ok(OptimalZoneResult { best, alternatives })
}
