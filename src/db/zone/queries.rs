use super::blocking_queries;
use super::schema::ZoneRecord;
use crate::zone::Zone;
use crate::Result;
use deadpool_sqlite::Pool;
use time::OffsetDateTime;

pub async fn upsert(zone: Zone, pool: &Pool) -> Result<ZoneRecord> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::upsert(&zone, conn))
        .await?
}

pub async fn select(
    updated_since: Option<OffsetDateTime>,
    include_inactive: bool,
    limit: Option<i64>,
    pool: &Pool,
) -> Result<Vec<ZoneRecord>> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select(updated_since, include_inactive, limit, conn))
        .await?
}

pub async fn select_by_id(id: i64, pool: &Pool) -> Result<ZoneRecord> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::select_by_id(id, conn))
        .await?
}

pub async fn set_active(id: i64, active: bool, pool: &Pool) -> Result<ZoneRecord> {
    pool.get()
        .await?
        .interact(move |conn| blocking_queries::set_active(id, active, conn))
        .await?
}
