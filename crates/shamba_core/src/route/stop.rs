use jiff::Timestamp;

use crate::{
    error::ValidationError,
    geometry::point::GeoPoint,
    ids::{FarmerId, RouteId, StopId},
};

/// A farmer's registered pickup location. The point is absent until the
/// farmer records coordinates; absence is a state of its own, never a
/// zero coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct FarmerLocation {
    farmer_id: FarmerId,
    point: Option<GeoPoint>,
    label: Option<String>,
}

impl FarmerLocation {
    pub fn new(farmer_id: FarmerId, point: Option<GeoPoint>) -> Self {
        FarmerLocation {
            farmer_id,
            point,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn farmer_id(&self) -> FarmerId {
        self.farmer_id
    }

    pub fn point(&self) -> Option<GeoPoint> {
        self.point
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopStatus {
    Pending,
    Arrived,
    Completed,
    Skipped,
}

impl StopStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, StopStatus::Completed | StopStatus::Skipped)
    }

    pub fn can_transition_to(self, next: StopStatus) -> bool {
        matches!(
            (self, next),
            (StopStatus::Pending, StopStatus::Arrived)
                | (StopStatus::Pending, StopStatus::Completed)
                | (StopStatus::Pending, StopStatus::Skipped)
                | (StopStatus::Arrived, StopStatus::Completed)
                | (StopStatus::Arrived, StopStatus::Skipped)
        )
    }
}

/// One planned visit within a route. The point is a snapshot taken when
/// the route was generated, not a live reference to the farmer record.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStop {
    id: StopId,
    route_id: RouteId,
    farmer_id: FarmerId,
    sequence_order: u32,
    status: StopStatus,
    arrival_time: Option<Timestamp>,
    completion_time: Option<Timestamp>,
    notes: Option<String>,
    point: GeoPoint,
}

impl RouteStop {
    pub(crate) fn planned(
        id: StopId,
        route_id: RouteId,
        farmer_id: FarmerId,
        sequence_order: u32,
        point: GeoPoint,
    ) -> Self {
        RouteStop {
            id,
            route_id,
            farmer_id,
            sequence_order,
            status: StopStatus::Pending,
            arrival_time: None,
            completion_time: None,
            notes: None,
            point,
        }
    }

    /// Rehydrate a stop loaded from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: StopId,
        route_id: RouteId,
        farmer_id: FarmerId,
        sequence_order: u32,
        status: StopStatus,
        arrival_time: Option<Timestamp>,
        completion_time: Option<Timestamp>,
        notes: Option<String>,
        point: GeoPoint,
    ) -> Result<Self, ValidationError> {
        if sequence_order < 1 {
            return Err(ValidationError::SequenceOrderOutOfRange { sequence_order });
        }

        Ok(RouteStop {
            id,
            route_id,
            farmer_id,
            sequence_order,
            status,
            arrival_time,
            completion_time,
            notes,
            point,
        })
    }

    pub fn id(&self) -> StopId {
        self.id
    }

    pub fn route_id(&self) -> RouteId {
        self.route_id
    }

    pub fn farmer_id(&self) -> FarmerId {
        self.farmer_id
    }

    pub fn sequence_order(&self) -> u32 {
        self.sequence_order
    }

    pub fn status(&self) -> StopStatus {
        self.status
    }

    pub fn arrival_time(&self) -> Option<Timestamp> {
        self.arrival_time
    }

    pub fn completion_time(&self) -> Option<Timestamp> {
        self.completion_time
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    pub fn with_notes(&self, notes: Option<String>) -> RouteStop {
        RouteStop {
            notes,
            ..self.clone()
        }
    }

    pub(crate) fn with_transition(
        &self,
        status: StopStatus,
        arrival_time: Option<Timestamp>,
        completion_time: Option<Timestamp>,
    ) -> RouteStop {
        RouteStop {
            status,
            arrival_time,
            completion_time,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{error::ValidationError, ids::StopId, test_utils};

    use super::{RouteStop, StopStatus};

    #[test]
    fn test_sequence_order_starts_at_one() {
        let point = test_utils::point(0.0, 0.0);

        let rejected = RouteStop::from_parts(
            StopId::new(uuid::Uuid::from_u128(1)),
            test_utils::route_id(1),
            test_utils::farmer_id(1),
            0,
            StopStatus::Pending,
            None,
            None,
            None,
            point,
        );

        assert_eq!(
            rejected,
            Err(ValidationError::SequenceOrderOutOfRange { sequence_order: 0 })
        );
    }

    #[test]
    fn test_notes_update_is_a_snapshot() {
        let stop = test_utils::pending_stop(1);

        let annotated = stop.with_notes(Some("gate locked, call ahead".to_owned()));

        assert_eq!(stop.notes(), None);
        assert_eq!(annotated.notes(), Some("gate locked, call ahead"));
        assert_eq!(annotated.status(), stop.status());
    }

    #[test]
    fn test_terminal_statuses_accept_no_moves() {
        for terminal in [StopStatus::Completed, StopStatus::Skipped] {
            assert!(terminal.is_terminal());
            for next in [
                StopStatus::Pending,
                StopStatus::Arrived,
                StopStatus::Completed,
                StopStatus::Skipped,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }
}
