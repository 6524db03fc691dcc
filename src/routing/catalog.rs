use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{PanelRecord, ENABLED_STATUS_VALUES};

use super::graph::DataCenterMap;
use super::location::{is_rack_identifier, Location};
use super::panel::{Classification, InterfaceType, Panel};
use super::search::SearchLimits;

/// Why a catalog row could not be turned into routable panels
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogRowError {
    #[error("unknown interface type {0:?}")]
    Interface(String),
    #[error("malformed rack {0:?}")]
    Rack(String),
    #[error("invalid port count {0:?}")]
    PortCount(String),
}

/// Split the comma-separated destination field, dropping blanks
pub fn parse_destinations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_count(raw: &str) -> Result<u32, CatalogRowError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| CatalogRowError::PortCount(raw.to_string()))
}

/// Parse `"dest: N, dest: N"` into per-destination counts. A bare number
/// applies to every destination; an empty field means zero everywhere.
/// Destinations the field does not mention get zero.
pub fn parse_port_counts(raw: &str, destinations: &[String]) -> Result<BTreeMap<String, u32>, CatalogRowError> {
    let mut counts: BTreeMap<String, u32> = destinations.iter().map(|d| (d.clone(), 0)).collect();

    if raw.contains(':') {
        for pair in raw.split(',') {
            let Some((dest, ports)) = pair.split_once(':') else {
                continue;
            };
            counts.insert(dest.trim().to_string(), parse_count(ports)?);
        }
    } else {
        let shared = parse_count(raw)?;
        for count in counts.values_mut() {
            *count = shared;
        }
    }

    Ok(counts)
}

pub fn parse_status(raw: &str) -> bool {
    ENABLED_STATUS_VALUES.contains(&raw.trim())
}

/// Explode one catalog row into a panel per destination.
/// Each gets the id `<dcim_id>_<destination>` and that destination's count.
pub fn panels_from_record(record: &PanelRecord) -> Result<Vec<Panel>, CatalogRowError> {
    let interface_type = InterfaceType::from_catalog(&record.interface)
        .ok_or_else(|| CatalogRowError::Interface(record.interface.clone()))?;

    if !is_rack_identifier(&record.rack) {
        return Err(CatalogRowError::Rack(record.rack.clone()));
    }

    let classification = record.classification.as_deref().and_then(Classification::parse_lenient);
    let destinations = parse_destinations(&record.destination);
    let counts = parse_port_counts(&record.how_many_ports_remain, &destinations)?;
    let status = parse_status(&record.status);

    Ok(destinations
        .into_iter()
        .map(|dest| Panel {
            id: format!("{}_{}", record.dcim_id, dest),
            room: record.room.clone(),
            location: Location::new(record.rack.trim(), record.u.clone()),
            interface_type,
            status,
            free_ports: counts.get(&dest).copied().unwrap_or(0),
            classification,
            destination: dest,
        })
        .collect())
}

/// Build and connect the panel graph for one query.
/// Rows that fail to parse are logged and left out.
pub fn build_map(records: &[PanelRecord], limits: SearchLimits) -> DataCenterMap {
    let mut map = DataCenterMap::with_limits(limits);
    let mut skipped = 0;

    for record in records {
        match panels_from_record(record) {
            Ok(panels) => {
                for panel in panels {
                    map.add_panel(panel);
                }
            }
            Err(e) => {
                skipped += 1;
                tracing::warn!("Skipping panel {}: {}", record.dcim_id, e);
            }
        }
    }

    map.connect_panels();
    tracing::info!(
        "Panel map built from {} rows ({} skipped): {} panels",
        records.len(),
        skipped,
        map.len()
    );
    map
}
