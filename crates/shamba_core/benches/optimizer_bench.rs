use criterion::{Criterion, criterion_group, criterion_main};
use uuid::Uuid;

use shamba_core::{
    geometry::point::GeoPoint,
    ids::FarmerId,
    route::{
        optimizer::{OptimizerParams, optimize_route},
        stop::FarmerLocation,
    },
};

fn grid_farmers(rows: usize, cols: usize) -> Vec<FarmerLocation> {
    let mut farmers = Vec::with_capacity(rows * cols);

    for row in 0..rows {
        for col in 0..cols {
            let point = GeoPoint::try_from_lat_lon(row as f64 * 0.01, col as f64 * 0.01).unwrap();
            let id = FarmerId::new(Uuid::from_u128((row * cols + col) as u128));
            farmers.push(FarmerLocation::new(id, Some(point)));
        }
    }

    farmers
}

fn bench_optimize(c: &mut Criterion) {
    let start = GeoPoint::try_from_lat_lon(0.0, 0.0).unwrap();
    let params = OptimizerParams::default();

    let small = grid_farmers(4, 4);
    c.bench_function("optimize_route_16_stops", |b| {
        b.iter(|| optimize_route(&start, &small, &params))
    });

    let large = grid_farmers(8, 8);
    c.bench_function("optimize_route_64_stops", |b| {
        b.iter(|| optimize_route(&start, &large, &params))
    });
}

criterion_group!(benches, bench_optimize);
criterion_main!(benches);
