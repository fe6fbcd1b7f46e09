use crate::seed;
use crate::service;
use crate::zone::ZoneRegistry;
use crate::Result;
use deadpool_sqlite::Pool;
use tracing::info;

pub async fn run(pool: &Pool) -> Result<()> {
    let registry = ZoneRegistry::new();
    let zone = service::zone::upsert(seed::national_zone(), &registry, pool).await?;
    info!(zone_id = zone.id, zone_name = %zone.name, "Seeded zone");
    Ok(())
}
