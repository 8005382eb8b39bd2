use jiff::Timestamp;

use crate::{
    error::TransitionError,
    route::{
        route::{Route, RouteStatus},
        stop::{RouteStop, StopStatus},
    },
};

/// Advance a route through PLANNED → IN_PROGRESS → {COMPLETED, CANCELLED}.
/// Terminal states are sinks. On an illegal move the input is returned
/// untouched inside the error.
pub fn transition_route(route: &Route, next: RouteStatus) -> Result<Route, TransitionError> {
    if !route.status().can_transition_to(next) {
        return Err(TransitionError::Route {
            id: route.id(),
            from: route.status(),
            to: next,
        });
    }

    Ok(route.with_status(next))
}

/// Advance a stop through PENDING → ARRIVED → COMPLETED, with SKIPPED as
/// a terminal side exit from either non-terminal state.
///
/// Arrival stamps `arrival_time = now` when unset; completion stamps
/// `completion_time = now` and backfills the arrival if none was ever
/// recorded. `now` is supplied by the caller, the core never reads the
/// clock.
pub fn transition_stop(
    stop: &RouteStop,
    next: StopStatus,
    now: Timestamp,
) -> Result<RouteStop, TransitionError> {
    if !stop.status().can_transition_to(next) {
        return Err(TransitionError::Stop {
            id: stop.id(),
            from: stop.status(),
            to: next,
        });
    }

    let arrival_time = match (next, stop.arrival_time()) {
        (StopStatus::Arrived, None) => Some(now),
        (StopStatus::Completed, None) => Some(now),
        (_, recorded) => recorded,
    };
    let completion_time = match next {
        StopStatus::Completed => Some(now),
        _ => stop.completion_time(),
    };

    Ok(stop.with_transition(next, arrival_time, completion_time))
}
