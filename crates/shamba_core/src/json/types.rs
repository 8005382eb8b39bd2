use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ValidationError,
    geometry::point::GeoPoint,
    ids::{FarmerId, OwnerId, ZoneId},
    route::{
        optimizer::{Kmh, RouteSolution},
        stop::FarmerLocation,
    },
    zone::{boundary::ZoneCandidate, zone::Zone},
};

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "Point")]
pub struct JsonPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl TryFrom<&JsonPoint> for GeoPoint {
    type Error = ValidationError;

    fn try_from(value: &JsonPoint) -> Result<Self, Self::Error> {
        GeoPoint::try_from_lat_lon(value.latitude, value.longitude)
    }
}

impl From<&GeoPoint> for JsonPoint {
    fn from(value: &GeoPoint) -> Self {
        JsonPoint {
            latitude: value.lat(),
            longitude: value.lon(),
        }
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "Zone")]
pub struct JsonZone {
    pub id: Uuid,
    pub name: String,
    pub center: JsonPoint,
    pub radius_km: f64,
    pub owner_id: Uuid,
    pub produce_type: Option<String>,
    pub comments: Option<String>,
}

impl TryFrom<&JsonZone> for Zone {
    type Error = ValidationError;

    fn try_from(value: &JsonZone) -> Result<Self, Self::Error> {
        let zone = Zone::new(
            ZoneId::new(value.id),
            value.name.clone(),
            GeoPoint::try_from(&value.center)?,
            value.radius_km,
            OwnerId::new(value.owner_id),
        )?;

        Ok(zone
            .with_produce_type(value.produce_type.clone())
            .with_comments(value.comments.clone()))
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone, Copy)]
#[serde(deny_unknown_fields, rename = "ZoneCandidate")]
pub struct JsonZoneCandidate {
    pub center: JsonPoint,
    pub radius_km: f64,
}

impl TryFrom<&JsonZoneCandidate> for ZoneCandidate {
    type Error = ValidationError;

    fn try_from(value: &JsonZoneCandidate) -> Result<Self, Self::Error> {
        Ok(ZoneCandidate {
            center: GeoPoint::try_from(&value.center)?,
            radius_km: value.radius_km,
        })
    }
}

#[derive(Serialize, Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "FarmerLocation")]
pub struct JsonFarmerLocation {
    pub farmer_id: Uuid,
    pub point: Option<JsonPoint>,
    pub label: Option<String>,
}

impl TryFrom<&JsonFarmerLocation> for FarmerLocation {
    type Error = ValidationError;

    fn try_from(value: &JsonFarmerLocation) -> Result<Self, Self::Error> {
        let point = match &value.point {
            Some(point) => Some(GeoPoint::try_from(point)?),
            None => None,
        };

        let farmer = FarmerLocation::new(FarmerId::new(value.farmer_id), point);

        Ok(match &value.label {
            Some(label) => farmer.with_label(label.clone()),
            None => farmer,
        })
    }
}

/// Everything needed to plan one collection trip.
#[derive(Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "PickupPlanRequest")]
pub struct JsonPickupPlanRequest {
    pub zone: JsonZone,
    pub farmers: Vec<JsonFarmerLocation>,
    pub average_speed_kmh: Option<f64>,
}

impl JsonPickupPlanRequest {
    pub fn speed(&self) -> Result<Kmh, ValidationError> {
        match self.average_speed_kmh {
            Some(kmh) => Kmh::try_new(kmh),
            None => Ok(Kmh::default()),
        }
    }
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "ZoneValidationRequest")]
pub struct JsonZoneValidationRequest {
    pub candidate: JsonZoneCandidate,
    pub existing_zones: Vec<JsonZone>,
}

#[derive(Deserialize, JsonSchema, Debug, Clone)]
#[serde(deny_unknown_fields, rename = "ZoneAssignmentRequest")]
pub struct JsonZoneAssignmentRequest {
    pub point: Option<JsonPoint>,
    pub zones: Vec<JsonZone>,
}

#[derive(Serialize, Debug, Clone)]
pub struct JsonOrderedStop {
    pub sequence_order: u32,
    pub farmer_id: Uuid,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Serialize, Debug, Clone)]
pub struct JsonRoutePlan {
    pub ordered_stops: Vec<JsonOrderedStop>,
    pub total_distance_km: f64,
    pub estimated_duration_minutes: i64,
    pub warnings: Vec<String>,
}

impl From<&RouteSolution> for JsonRoutePlan {
    fn from(solution: &RouteSolution) -> Self {
        JsonRoutePlan {
            ordered_stops: solution
                .ordered_stops()
                .iter()
                .map(|stop| JsonOrderedStop {
                    sequence_order: stop.sequence_order(),
                    farmer_id: stop.farmer_id().get(),
                    latitude: stop.point().lat(),
                    longitude: stop.point().lon(),
                })
                .collect(),
            total_distance_km: solution.total_distance_km(),
            estimated_duration_minutes: solution.estimated_duration_minutes(),
            warnings: solution
                .warnings()
                .iter()
                .map(|warning| warning.to_string())
                .collect(),
        }
    }
}
