use thiserror::Error;

use crate::{
    ids::{FarmerId, RouteId, StopId},
    route::{route::RouteStatus, stop::StopStatus},
};

/// Bad input shape. Always reported to the caller, never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("latitude {value} is outside [-90.0, 90.0]")]
    LatitudeOutOfRange { value: f64 },
    #[error("longitude {value} is outside [-180.0, 180.0]")]
    LongitudeOutOfRange { value: f64 },
    #[error("coordinates carry more than {max_decimal_places} decimal places")]
    PrecisionExceeded { max_decimal_places: u32 },
    #[error("zone radius {radius_km} km is outside [0.1, 100.0] km")]
    RadiusOutOfRange { radius_km: f64 },
    #[error("average speed {kmh} km/h must be positive")]
    SpeedNotPositive { kmh: f64 },
    #[error("stop sequence order {sequence_order} must be 1 or greater")]
    SequenceOrderOutOfRange { sequence_order: u32 },
    #[error("a farmer location is required")]
    LocationRequired,
}

/// A referenced entity is absent. Surfaced as-is; the core never invents
/// defaults for missing entities.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("no zones available")]
    NoZonesAvailable,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptimalZoneError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
}

/// Illegal state-machine move. Rejected synchronously, no partial mutation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("route {id} cannot move from {from:?} to {to:?}")]
    Route {
        id: RouteId,
        from: RouteStatus,
        to: RouteStatus,
    },
    #[error("route {id} is {status:?} and can no longer be modified")]
    RouteClosed { id: RouteId, status: RouteStatus },
    #[error("stop {id} cannot move from {from:?} to {to:?}")]
    Stop {
        id: StopId,
        from: StopStatus,
        to: StopStatus,
    },
}

/// Not fatal: collected and returned alongside a partial result so the
/// caller can decide whether to proceed or abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryWarning {
    MissingLocation { farmer_id: FarmerId },
}

impl std::fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeometryWarning::MissingLocation { farmer_id } => {
                write!(f, "farmer {farmer_id} has no recorded location and was left out")
            }
        }
    }
}
