use std::{fs::File, path::Path};

use anyhow::Context;
use comfy_table::Table;
use tracing::{info, warn};

use shamba_core::{
    ids::RouteId,
    json::types::{JsonPickupPlanRequest, JsonRoutePlan},
    route::{
        optimizer::{Kmh, OptimizerParams, optimize_route},
        route::Route,
        stop::FarmerLocation,
    },
    zone::zone::Zone,
};

pub fn optimize(input: &Path, speed_kmh: Option<f64>, json: bool) -> Result<(), anyhow::Error> {
    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let request: JsonPickupPlanRequest = serde_json::from_reader(file)?;

    let zone = Zone::try_from(&request.zone)?;
    let farmers = request
        .farmers
        .iter()
        .map(FarmerLocation::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let average_speed = match speed_kmh {
        Some(kmh) => Kmh::try_new(kmh)?,
        None => request.speed()?,
    };
    let params = OptimizerParams { average_speed };

    let solution = optimize_route(&zone.center(), &farmers, &params);

    for warning in solution.warnings() {
        warn!("{warning}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&JsonRoutePlan::from(&solution))?);
        return Ok(());
    }

    let route = Route::planned(
        RouteId::random(),
        zone.id(),
        zone.owner_id(),
        jiff::Zoned::now().date(),
        &solution,
    );
    info!(
        route = %route.id(),
        zone = %zone.id(),
        stops = route.stops().len(),
        "pickup route planned"
    );

    let mut table = Table::new();
    table.set_header(["#", "farmer", "location", "status"]);
    for stop in route.stops() {
        table.add_row([
            stop.sequence_order().to_string(),
            stop.farmer_id().to_string(),
            stop.point().to_string(),
            format!("{:?}", stop.status()),
        ]);
    }
    println!("{table}");
    println!(
        "total distance: {:.2} km, estimated duration: {} min",
        route.total_distance_km(),
        route.estimated_duration_minutes()
    );

    Ok(())
}
