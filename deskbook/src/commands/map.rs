use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use desk_client::{DeskDirectory, Zone};
use desk_map::{DeskMarker, MapRenderer, OccupancyTable, ZoneMap};
use shared::date_to_str;
use tracing::{info, warn};

/// Walk everybody's reservations for the directory's day and draw the maps
pub async fn run(
    directory: &DeskDirectory,
    out: &Path,
    vip: Vec<String>,
    font: Option<&Path>,
) -> anyhow::Result<()> {
    let day = directory.day();
    let employees = directory.employees().get(false).await?;
    let zones = directory.zones().get(false).await?;

    let table = OccupancyTable::new(
        employees.iter().map(|e| e.name.as_str()),
        zones.iter().map(|z| z.name.as_str()),
    );
    info!("Desks taken on {}", date_to_str(day));
    info!("{}", table.header());

    let mut occupancy = HashMap::new();
    for (index, employee) in employees.iter().enumerate() {
        let reservation = match employee.reservations.on(day).await {
            Ok(reservation) => reservation,
            Err(e) => {
                warn!(employee = %employee.name, "Skipping reservations: {}", e);
                None
            }
        };
        let seat = reservation
            .as_ref()
            .map(|r| (r.zone.name.as_str(), r.desk.name.as_str()));
        info!("{}", table.row(index, &employee.name, seat));

        if let Some(reservation) = &reservation {
            occupancy.insert(reservation.desk.id.clone(), employee.name.clone());
        }
    }

    let mut maps = Vec::with_capacity(zones.len());
    for zone in &zones {
        match zone_map(zone).await? {
            Some(map) => maps.push(map),
            None => warn!(zone = %zone.name, "No map image, zone left out"),
        }
    }

    let mut renderer = MapRenderer::new(occupancy, vip)?;
    if let Some(font) = font {
        let bytes = fs::read(font)
            .with_context(|| format!("Failed to read font {}", font.display()))?;
        renderer = renderer
            .with_font(bytes)
            .with_context(|| format!("Failed to load font {}", font.display()))?;
    }

    let written = renderer
        .render(&maps, out)
        .with_context(|| format!("Failed to render maps into {}", out.display()))?;
    for path in &written {
        info!("Created map {}", path.display());
    }
    info!("Result location: {}", out.display());
    Ok(())
}

async fn zone_map(zone: &Zone) -> anyhow::Result<Option<ZoneMap>> {
    let Some(image) = zone.map_image().await? else {
        return Ok(None);
    };
    let desks = zone
        .desks
        .get(false)
        .await?
        .iter()
        .map(|desk| DeskMarker {
            id: desk.id.clone(),
            x: desk.x,
            y: desk.y,
            radius: desk.radius,
            state: desk.state,
        })
        .collect();

    Ok(Some(ZoneMap {
        name: zone.name.clone(),
        image,
        desks,
    }))
}
