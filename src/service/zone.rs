use crate::db;
use crate::zone::{Zone, ZoneRegistry};
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use tracing::info;

// Validation runs before the write, so an invalid zone never reaches the
// database, and the registry only sees zones the database accepted. Every
// mutation holds the registry write lock from the database write until the
// publish, so the registry always ends in the same state as the database.
pub async fn upsert(zone: Zone, registry: &ZoneRegistry, pool: &Pool) -> Result<Zone> {
    let zone = zone.validated()?;
    let _guard = registry.lock_writes().await;
    let record = db::zone::queries::upsert(zone, pool).await?;
    registry.upsert(record.zone)
}

pub async fn deactivate(id: i64, registry: &ZoneRegistry, pool: &Pool) -> Result<Zone> {
    let _guard = registry.lock_writes().await;
    let record = db::zone::queries::set_active(id, false, pool).await?;
    match registry.deactivate(id) {
        Ok(zone) => Ok(zone),
        // persisted but not loaded, the row failed validation during the last refresh
        Err(Error::NotFound(_)) => Ok(record.zone),
        Err(e) => Err(e),
    }
}

/// Reloads every persisted zone into the registry, returns the number of zones loaded.
pub async fn refresh(registry: &ZoneRegistry, pool: &Pool) -> Result<usize> {
    let _guard = registry.lock_writes().await;
    let records = db::zone::queries::select(None, true, None, pool).await?;
    let total = records.len();
    let loaded = registry.replace_all(records.into_iter().map(|it| it.zone).collect());
    info!(total, loaded, "Zones refreshed from database");
    Ok(loaded)
}
