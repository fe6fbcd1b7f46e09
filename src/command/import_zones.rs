use crate::service;
use crate::zone::{Zone, ZoneRegistry};
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use std::fs;
use std::path::Path;
use tracing::info;

/// Imports a JSON array of zones. The whole file is validated before anything
/// is written, a single invalid zone aborts the import.
pub async fn run(path: &Path, pool: &Pool) -> Result<usize> {
    let json = fs::read_to_string(path)?;
    let zones: Vec<Zone> = serde_json::from_str(&json)?;
    let zones = zones
        .into_iter()
        .map(|zone| {
            let id = zone.id;
            zone.validated().map_err(|e| match e {
                Error::InvalidZoneConfig(msg) => {
                    Error::InvalidZoneConfig(format!("{} (zone {id})", msg))
                }
                e => e,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let registry = ZoneRegistry::new();
    for zone in zones.iter().cloned() {
        service::zone::upsert(zone, &registry, pool).await?;
    }
    info!(path = %path.display(), imported = zones.len(), "Imported zones");
    Ok(zones.len())
}
