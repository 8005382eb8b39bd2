use std::{fs::File, path::Path};

use anyhow::Context;
use comfy_table::Table;
use tracing::info;

use shamba_core::{
    geometry::point::GeoPoint,
    json::types::{JsonZoneAssignmentRequest, JsonZoneValidationRequest},
    zone::{
        boundary::{ZoneCandidate, validate_new_zone},
        membership::find_optimal_zone,
        zone::Zone,
    },
};

pub fn validate(input: &Path) -> Result<(), anyhow::Error> {
    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let request: JsonZoneValidationRequest = serde_json::from_reader(file)?;

    let candidate = ZoneCandidate::try_from(&request.candidate)?;
    let existing = request
        .existing_zones
        .iter()
        .map(Zone::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let verdict = validate_new_zone(&candidate, &existing)?;

    if verdict.is_valid() {
        info!(existing = existing.len(), "zone placement is valid");
        println!("valid: no overlap with {} existing zone(s)", existing.len());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(["zone", "center distance (km)", "overlap (km)", "overlap %"]);
    for overlap in verdict.overlaps() {
        table.add_row([
            overlap.zone_id().to_string(),
            format!("{:.2}", overlap.center_distance_km()),
            format!("{:.2}", overlap.overlap_distance_km()),
            overlap.overlap_percentage().to_string(),
        ]);
    }
    println!("invalid: candidate overlaps {} zone(s)", verdict.overlaps().len());
    println!("{table}");

    if let Some(suggested) = verdict.suggested_radius_km() {
        println!("suggested radius: {suggested:.2} km");
    }

    Ok(())
}

pub fn resolve(input: &Path) -> Result<(), anyhow::Error> {
    let file =
        File::open(input).with_context(|| format!("failed to open {}", input.display()))?;
    let request: JsonZoneAssignmentRequest = serde_json::from_reader(file)?;

    let point = match &request.point {
        Some(point) => Some(GeoPoint::try_from(point)?),
        None => None,
    };
    let zones = request
        .zones
        .iter()
        .map(Zone::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let result = find_optimal_zone(point, &zones)?;

    let best = result.best();
    println!(
        "best zone: {} at {:.2} km ({})",
        best.zone_id(),
        best.distance_km(),
        if best.within_bounds() {
            "within bounds"
        } else {
            "outside bounds"
        }
    );

    if !result.alternatives().is_empty() {
        let mut table = Table::new();
        table.set_header(["alternative", "distance (km)", "within bounds"]);
        for alternative in result.alternatives() {
            table.add_row([
                alternative.zone_id().to_string(),
                format!("{:.2}", alternative.distance_km()),
                alternative.within_bounds().to_string(),
            ]);
        }
        println!("{table}");
    }

    Ok(())
}
