use crate::zone::{Zone, ZoneRegistry};
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct Params {
    pub zone: Zone,
}

pub async fn run(params: Params, registry: &ZoneRegistry, pool: &Pool) -> Result<Zone> {
    let zone = service::zone::upsert(params.zone, registry, pool).await?;
    info!(
        zone_id = zone.id,
        zone_name = %zone.name,
        bands = zone.tariff_bands.len(),
        "Admin upserted zone"
    );
    Ok(zone)
}
