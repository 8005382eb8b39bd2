use fixedbitset::FixedBitSet;
use tracing::{Level, debug, instrument};

use crate::{
    error::{GeometryWarning, ValidationError},
    geometry::point::GeoPoint,
    ids::FarmerId,
    route::stop::FarmerLocation,
};

pub const DEFAULT_COLLECTION_SPEED_KMH: f64 = 40.0;

/// Refinement stops after this many full passes even if moves keep
/// improving; each applied move shortens the path, so this only cuts off
/// the long tail.
const MAX_REFINE_PASSES: usize = 10;

/// Minimum gain for a segment reversal to be applied, keeps the search
/// from thrashing on floating-point noise.
const IMPROVEMENT_EPSILON_KM: f64 = 1e-4;

/// Kilometers per hour.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Kmh(f64);

impl Kmh {
    pub fn try_new(value: f64) -> Result<Self, ValidationError> {
        if value <= 0.0 || !value.is_finite() {
            return Err(ValidationError::SpeedNotPositive { kmh: value });
        }

        Ok(Kmh(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl Default for Kmh {
    fn default() -> Self {
        Kmh(DEFAULT_COLLECTION_SPEED_KMH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OptimizerParams {
    pub average_speed: Kmh,
}

/// One stop in its final visiting position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderedStop {
    farmer_id: FarmerId,
    point: GeoPoint,
    sequence_order: u32,
}

impl OrderedStop {
    pub fn farmer_id(&self) -> FarmerId {
        self.farmer_id
    }

    pub fn point(&self) -> GeoPoint {
        self.point
    }

    pub fn sequence_order(&self) -> u32 {
        self.sequence_order
    }
}

/// The visiting order for a collection trip plus the aggregates derived
/// from it. Total distance covers stop-to-stop legs only; the leg from
/// the start point to the first stop is not part of the sum.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSolution {
    ordered_stops: Vec<OrderedStop>,
    total_distance_km: f64,
    estimated_duration_minutes: i64,
    warnings: Vec<GeometryWarning>,
}

impl RouteSolution {
    pub fn ordered_stops(&self) -> &[OrderedStop] {
        &self.ordered_stops
    }

    pub fn total_distance_km(&self) -> f64 {
        self.total_distance_km
    }

    pub fn estimated_duration_minutes(&self) -> i64 {
        self.estimated_duration_minutes
    }

    /// Farmers that had to be left out of the route, for the caller to
    /// surface or act on. Never fatal.
    pub fn warnings(&self) -> &[GeometryWarning] {
        &self.warnings
    }
}

/// Flat pairwise distance matrix over the start point (index 0) and the
/// usable stops (stop i at index i + 1). `index = from * n + to`.
struct LegMatrix {
    distances: Vec<f64>,
    num_points: usize,
}

impl LegMatrix {
    fn from_haversine(start: &GeoPoint, points: &[GeoPoint]) -> Self {
        let num_points = points.len() + 1;
        let mut distances = vec![0.0; num_points * num_points];

        let mut all: Vec<GeoPoint> = Vec::with_capacity(num_points);
        all.push(*start);
        all.extend_from_slice(points);

        for i in 0..num_points {
            for j in (i + 1)..num_points {
                let distance = all[i].haversine_distance_km(&all[j]);
                distances[i * num_points + j] = distance;
                distances[j * num_points + i] = distance;
            }
        }

        LegMatrix {
            distances,
            num_points,
        }
    }

    #[inline(always)]
    fn get(&self, from: usize, to: usize) -> f64 {
        self.distances[from * self.num_points + to]
    }

    /// Distance between two stops (0-based stop indexes).
    #[inline(always)]
    fn leg(&self, from_stop: usize, to_stop: usize) -> f64 {
        self.get(from_stop + 1, to_stop + 1)
    }
}

/// Greedy construction: from the start point, repeatedly visit the
/// closest unvisited stop. Ties go to the lowest stop index so the
/// result is reproducible.
fn nearest_neighbor_order(matrix: &LegMatrix, num_stops: usize) -> Vec<usize> {
    let mut order = Vec::with_capacity(num_stops);
    let mut visited = FixedBitSet::with_capacity(num_stops);
    let mut current = 0usize; // matrix index of the start point

    for _ in 0..num_stops {
        let mut next = None;
        let mut next_distance = f64::INFINITY;

        for stop in 0..num_stops {
            if visited.contains(stop) {
                continue;
            }

            let distance = matrix.get(current, stop + 1);
            if distance < next_distance {
                next = Some(stop);
                next_distance = distance;
            }
        }

        if let Some(stop) = next {
            visited.insert(stop);
            order.push(stop);
            current = stop + 1;
        }
    }

    order
}

/// 2-opt over the stop-only open path: reverse `order[i + 1..=k]` whenever
/// swapping edges (i, i+1) and (k, k+1) for (i, k) and (i+1, k+1) shortens
/// the path by more than the epsilon. Bounded by [`MAX_REFINE_PASSES`];
/// exits early once a full pass applies no move.
fn refine_two_opt(matrix: &LegMatrix, order: &mut [usize]) {
    if order.len() < 4 {
        return; // no interior segment to reverse
    }

    for pass in 0..MAX_REFINE_PASSES {
        let mut improved = false;

        for i in 0..order.len() - 1 {
            for k in (i + 1)..order.len() - 1 {
                let current = matrix.leg(order[i], order[i + 1]) + matrix.leg(order[k], order[k + 1]);
                let proposed = matrix.leg(order[i], order[k]) + matrix.leg(order[i + 1], order[k + 1]);

                if proposed + IMPROVEMENT_EPSILON_KM < current {
                    order[i + 1..=k].reverse();
                    improved = true;
                }
            }
        }

        if !improved {
            debug!(passes = pass + 1, "refinement converged");
            return;
        }
    }

    debug!(passes = MAX_REFINE_PASSES, "refinement stopped at pass cap");
}

fn stop_leg_distance(matrix: &LegMatrix, order: &[usize]) -> f64 {
    order
        .windows(2)
        .map(|pair| matrix.leg(pair[0], pair[1]))
        .sum()
}

/// Compute the visiting order for a collection trip.
///
/// Farmers without a recorded location are excluded up front and reported
/// in the solution's warnings; everyone else comes back exactly once,
/// re-sequenced from 1.
#[instrument(skip_all, level = Level::DEBUG)]
pub fn optimize_route(
    start: &GeoPoint,
    farmers: &[FarmerLocation],
    params: &OptimizerParams,
) -> RouteSolution {
    let mut warnings = Vec::new();
    let mut usable: Vec<(FarmerId, GeoPoint)> = Vec::with_capacity(farmers.len());

    for farmer in farmers {
        match farmer.point() {
            Some(point) => usable.push((farmer.farmer_id(), point)),
            None => warnings.push(GeometryWarning::MissingLocation {
                farmer_id: farmer.farmer_id(),
            }),
        }
    }

    if usable.is_empty() {
        return RouteSolution {
            ordered_stops: Vec::new(),
            total_distance_km: 0.0,
            estimated_duration_minutes: 0,
            warnings,
        };
    }

    let points: Vec<GeoPoint> = usable.iter().map(|(_, point)| *point).collect();
    let matrix = LegMatrix::from_haversine(start, &points);

    let mut order = nearest_neighbor_order(&matrix, points.len());
    debug!(stops = order.len(), "construction complete");

    refine_two_opt(&matrix, &mut order);

    let total_distance_km = stop_leg_distance(&matrix, &order);
    let estimated_duration_minutes =
        (total_distance_km / params.average_speed.value() * 60.0).round() as i64;

    let ordered_stops = order
        .iter()
        .enumerate()
        .map(|(position, &stop)| {
            let (farmer_id, point) = usable[stop];

            OrderedStop {
                farmer_id,
                point,
                sequence_order: position as u32 + 1,
            }
        })
        .collect();

    debug!(
        total_distance_km,
        estimated_duration_minutes, "route optimized"
    );

    RouteSolution {
        ordered_stops,
        total_distance_km,
        estimated_duration_minutes,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        error::{GeometryWarning, ValidationError},
        ids::FarmerId,
        test_utils,
    };

    use super::{Kmh, OptimizerParams, optimize_route};

    fn sequence_of(solution: &super::RouteSolution) -> Vec<u32> {
        solution
            .ordered_stops()
            .iter()
            .map(|stop| stop.sequence_order())
            .collect()
    }

    #[test]
    fn test_speed_must_be_positive() {
        assert!(Kmh::try_new(40.0).is_ok());
        assert_eq!(
            Kmh::try_new(0.0),
            Err(ValidationError::SpeedNotPositive { kmh: 0.0 })
        );
        assert_eq!(
            Kmh::try_new(-5.0),
            Err(ValidationError::SpeedNotPositive { kmh: -5.0 })
        );
        assert_eq!(Kmh::default().value(), 40.0);
    }

    #[test]
    fn test_empty_input_yields_empty_route() {
        let start = test_utils::point(0.0, 0.0);

        let solution = optimize_route(&start, &[], &OptimizerParams::default());

        assert!(solution.ordered_stops().is_empty());
        assert_eq!(solution.total_distance_km(), 0.0);
        assert_eq!(solution.estimated_duration_minutes(), 0);
        assert!(solution.warnings().is_empty());
    }

    #[test]
    fn test_single_stop_route_is_trivial() {
        let start = test_utils::point(0.0, 0.0);
        let farmers = vec![test_utils::farmer(1, test_utils::offset_km(&start, 4.0, 0.0))];

        let solution = optimize_route(&start, &farmers, &OptimizerParams::default());

        assert_eq!(solution.ordered_stops().len(), 1);
        assert_eq!(solution.ordered_stops()[0].sequence_order(), 1);
        assert_eq!(solution.total_distance_km(), 0.0);
        assert_eq!(solution.estimated_duration_minutes(), 0);
    }

    #[test]
    fn test_two_stops_keep_construction_order() {
        let start = test_utils::point(0.0, 0.0);
        let near = test_utils::offset_km(&start, 2.0, 0.0);
        let far = test_utils::offset_km(&start, 7.0, 0.0);
        let farmers = vec![test_utils::farmer(1, far), test_utils::farmer(2, near)];

        let solution = optimize_route(&start, &farmers, &OptimizerParams::default());

        let visited: Vec<FarmerId> = solution
            .ordered_stops()
            .iter()
            .map(|stop| stop.farmer_id())
            .collect();
        assert_eq!(
            visited,
            vec![test_utils::farmer_id(2), test_utils::farmer_id(1)]
        );
        assert_eq!(sequence_of(&solution), vec![1, 2]);
        assert!((solution.total_distance_km() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_locations_are_reported_not_dropped_silently() {
        let start = test_utils::point(0.0, 0.0);
        let farmers = vec![
            test_utils::farmer(1, test_utils::offset_km(&start, 1.0, 0.0)),
            test_utils::farmer_without_location(2),
            test_utils::farmer(3, test_utils::offset_km(&start, 2.0, 0.0)),
        ];

        let solution = optimize_route(&start, &farmers, &OptimizerParams::default());

        assert_eq!(solution.ordered_stops().len(), 2);
        assert_eq!(
            solution.warnings(),
            &[GeometryWarning::MissingLocation {
                farmer_id: test_utils::farmer_id(2)
            }]
        );
    }

    #[test]
    fn test_result_is_a_permutation_of_the_input() {
        let start = test_utils::point(0.0, 0.0);
        let offsets = [
            (3.0, 1.0),
            (-2.0, 4.0),
            (7.0, -3.0),
            (1.5, 1.5),
            (-5.0, -5.0),
            (0.5, 6.0),
        ];
        let farmers: Vec<_> = offsets
            .iter()
            .enumerate()
            .map(|(n, &(north, east))| {
                test_utils::farmer(n as u128 + 1, test_utils::offset_km(&start, north, east))
            })
            .collect();

        let solution = optimize_route(&start, &farmers, &OptimizerParams::default());

        let mut visited: Vec<FarmerId> = solution
            .ordered_stops()
            .iter()
            .map(|stop| stop.farmer_id())
            .collect();
        visited.sort();
        visited.dedup();
        assert_eq!(visited.len(), farmers.len());

        assert_eq!(sequence_of(&solution), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_two_opt_reverses_a_tangled_interior_segment() {
        let start = test_utils::point(0.0, 0.0);
        // four stops in a column, 1..4 km due north
        let points: Vec<_> = (1..=4)
            .map(|n| test_utils::offset_km(&start, n as f64, 0.0))
            .collect();
        let matrix = super::LegMatrix::from_haversine(&start, &points);

        // visiting 1, 3, 2, 4 crosses its own track between the ends
        let mut order = vec![0, 2, 1, 3];
        let before = super::stop_leg_distance(&matrix, &order);

        super::refine_two_opt(&matrix, &mut order);

        assert_eq!(order, vec![0, 1, 2, 3]);
        let after = super::stop_leg_distance(&matrix, &order);
        assert!(after < before);
        assert!((after - 3.0).abs() < 1e-6, "got {after} km");
    }

    #[test]
    fn test_greedy_construction_sweeps_outward() {
        let start = test_utils::point(0.0, 0.0);
        let farmers = vec![
            test_utils::farmer(1, test_utils::offset_km(&start, 1.0, 0.0)),
            test_utils::farmer(2, test_utils::offset_km(&start, 12.0, 0.1)),
            test_utils::farmer(3, test_utils::offset_km(&start, 11.0, 0.0)),
            test_utils::farmer(4, test_utils::offset_km(&start, 10.0, 0.1)),
        ];

        let solution = optimize_route(&start, &farmers, &OptimizerParams::default());

        let visited: Vec<FarmerId> = solution
            .ordered_stops()
            .iter()
            .map(|stop| stop.farmer_id())
            .collect();
        assert_eq!(
            visited,
            vec![
                test_utils::farmer_id(1),
                test_utils::farmer_id(4),
                test_utils::farmer_id(3),
                test_utils::farmer_id(2),
            ]
        );
    }

    #[test]
    fn test_refinement_never_worsens_the_total() {
        let start = test_utils::point(0.0, 0.0);
        let offsets = [
            (2.0, 9.0),
            (-4.0, 3.0),
            (8.0, -1.0),
            (5.0, 5.0),
            (-1.0, -6.0),
            (9.0, 9.0),
            (0.5, 2.5),
        ];
        let farmers: Vec<_> = offsets
            .iter()
            .enumerate()
            .map(|(n, &(north, east))| {
                test_utils::farmer(n as u128 + 1, test_utils::offset_km(&start, north, east))
            })
            .collect();
        let params = OptimizerParams::default();

        let first = optimize_route(&start, &farmers, &params);
        let second = optimize_route(&start, &farmers, &params);

        // deterministic: re-running the same input reproduces the result
        assert_eq!(first, second);

        // and the refined order is never longer than plain construction
        let greedy_only = {
            let points: Vec<_> = farmers.iter().filter_map(|farmer| farmer.point()).collect();
            let matrix = super::LegMatrix::from_haversine(&start, &points);
            let order = super::nearest_neighbor_order(&matrix, points.len());
            super::stop_leg_distance(&matrix, &order)
        };
        assert!(first.total_distance_km() <= greedy_only + 1e-9);
    }

    #[test]
    fn test_duration_follows_the_configured_speed() {
        let start = test_utils::point(0.0, 0.0);
        let farmers = vec![
            test_utils::farmer(1, test_utils::offset_km(&start, 1.0, 0.0)),
            test_utils::farmer(2, test_utils::offset_km(&start, 21.0, 0.0)),
        ];

        let default_speed = optimize_route(&start, &farmers, &OptimizerParams::default());
        // 20 km at 40 km/h
        assert_eq!(default_speed.estimated_duration_minutes(), 30);

        let params = OptimizerParams {
            average_speed: Kmh::try_new(10.0).unwrap(),
        };
        let slow = optimize_route(&start, &farmers, &params);
        // 20 km at 10 km/h
        assert_eq!(slow.estimated_duration_minutes(), 120);
    }
}
