use crate::zone::{Zone, ZoneRegistry};
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Deserialize;
use tracing::info;

#[derive(Deserialize)]
pub struct Params {
    pub id: i64,
}

pub async fn run(params: Params, registry: &ZoneRegistry, pool: &Pool) -> Result<Zone> {
    let zone = service::zone::deactivate(params.id, registry, pool).await?;
    info!(zone_id = zone.id, zone_name = %zone.name, "Admin deactivated zone");
    Ok(zone)
}
