use uuid::Uuid;

use crate::{
    error::ValidationError,
    geometry::point::{EARTH_RADIUS_KM, GeoPoint},
    ids::{FarmerId, OwnerId, RouteId, StopId, ZoneId},
    route::{
        optimizer::RouteSolution,
        route::Route,
        stop::{FarmerLocation, RouteStop},
    },
    zone::zone::Zone,
};

pub const KM_PER_DEGREE: f64 = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;

pub fn point(latitude: f64, longitude: f64) -> GeoPoint {
    GeoPoint::try_from_lat_lon(latitude, longitude).unwrap()
}

/// Point displaced from `origin` by kilometers due north / due east.
/// Exact along a meridian or the equator, close enough elsewhere for the
/// small offsets used in tests.
pub fn offset_km(origin: &GeoPoint, north_km: f64, east_km: f64) -> GeoPoint {
    let latitude = origin.lat() + north_km / KM_PER_DEGREE;
    let longitude = origin.lon() + east_km / (KM_PER_DEGREE * origin.lat().to_radians().cos());

    point(latitude, longitude)
}

pub fn zone_id(n: u128) -> ZoneId {
    ZoneId::new(Uuid::from_u128(n))
}

pub fn owner_id(n: u128) -> OwnerId {
    OwnerId::new(Uuid::from_u128(0x0A00 + n))
}

pub fn farmer_id(n: u128) -> FarmerId {
    FarmerId::new(Uuid::from_u128(0xF000 + n))
}

pub fn route_id(n: u128) -> RouteId {
    RouteId::new(Uuid::from_u128(0xE000 + n))
}

pub fn try_zone(n: u128, center: GeoPoint, radius_km: f64) -> Result<Zone, ValidationError> {
    Zone::new(zone_id(n), format!("zone-{n}"), center, radius_km, owner_id(n))
}

pub fn zone(n: u128, center: GeoPoint, radius_km: f64) -> Zone {
    try_zone(n, center, radius_km).unwrap()
}

pub fn farmer(n: u128, point: GeoPoint) -> FarmerLocation {
    FarmerLocation::new(farmer_id(n), Some(point))
}

pub fn farmer_without_location(n: u128) -> FarmerLocation {
    FarmerLocation::new(farmer_id(n), None)
}

pub fn planned_route(n: u128, solution: &RouteSolution) -> Route {
    Route::planned(
        route_id(n),
        zone_id(n),
        owner_id(n),
        "2026-03-02".parse().unwrap(),
        solution,
    )
}

pub fn pending_stop(n: u128) -> RouteStop {
    RouteStop::planned(
        StopId::new(Uuid::from_u128(0x5000 + n)),
        route_id(n),
        farmer_id(n),
        1,
        point(0.0, 0.0),
    )
}
