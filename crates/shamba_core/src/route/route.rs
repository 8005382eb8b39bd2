use jiff::civil::Date;

use crate::{
    error::TransitionError,
    ids::{OwnerId, RouteId, StopId, ZoneId},
    route::{optimizer::RouteSolution, stop::RouteStop},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStatus {
    Planned,
    InProgress,
    Completed,
    Cancelled,
}

impl RouteStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, RouteStatus::Completed | RouteStatus::Cancelled)
    }

    pub fn can_transition_to(self, next: RouteStatus) -> bool {
        matches!(
            (self, next),
            (RouteStatus::Planned, RouteStatus::InProgress)
                | (RouteStatus::InProgress, RouteStatus::Completed)
                | (RouteStatus::InProgress, RouteStatus::Cancelled)
        )
    }
}

/// A scheduled collection trip over one zone. The stop list and the two
/// aggregate fields always come from the same optimizer solution, so they
/// cannot drift apart.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    id: RouteId,
    zone_id: ZoneId,
    owner_id: OwnerId,
    scheduled_date: Date,
    status: RouteStatus,
    stops: Vec<RouteStop>,
    total_distance_km: f64,
    estimated_duration_minutes: i64,
}

impl Route {
    /// Build a fresh route from an optimizer solution.
    pub fn planned(
        id: RouteId,
        zone_id: ZoneId,
        owner_id: OwnerId,
        scheduled_date: Date,
        solution: &RouteSolution,
    ) -> Route {
        Route {
            id,
            zone_id,
            owner_id,
            scheduled_date,
            status: RouteStatus::Planned,
            stops: Route::stop_batch(id, solution),
            total_distance_km: solution.total_distance_km(),
            estimated_duration_minutes: solution.estimated_duration_minutes(),
        }
    }

    /// Re-optimization replaces everything derived from the ordering in
    /// one step: the whole stop batch plus both aggregate fields. The
    /// caller persists the result as a single transaction. Closed routes
    /// cannot be regenerated.
    pub fn regenerated(&self, solution: &RouteSolution) -> Result<Route, TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::RouteClosed {
                id: self.id,
                status: self.status,
            });
        }

        Ok(Route {
            id: self.id,
            zone_id: self.zone_id,
            owner_id: self.owner_id,
            scheduled_date: self.scheduled_date,
            status: self.status,
            stops: Route::stop_batch(self.id, solution),
            total_distance_km: solution.total_distance_km(),
            estimated_duration_minutes: solution.estimated_duration_minutes(),
        })
    }

    fn stop_batch(route_id: RouteId, solution: &RouteSolution) -> Vec<RouteStop> {
        solution
            .ordered_stops()
            .iter()
            .map(|stop| {
                RouteStop::planned(
                    StopId::random(),
                    route_id,
                    stop.farmer_id(),
                    stop.sequence_order(),
                    stop.point(),
                )
            })
            .collect()
    }

    pub(crate) fn with_status(&self, status: RouteStatus) -> Route {
        Route {
            status,
            ..self.clone()
        }
    }

    pub fn id(&self) -> RouteId {
        self.id
    }

    pub fn zone_id(&self) -> ZoneId {
        self.zone_id
    }

    pub fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    pub fn scheduled_date(&self) -> Date {
        self.scheduled_date
    }

    pub fn status(&self) -> RouteStatus {
        self.status
    }

    /// Stops in visiting order, sequence numbers contiguous from 1.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn estimated_duration_minutes(&self) -> i64 {
        self.estimated_duration_minutes
    }
}
