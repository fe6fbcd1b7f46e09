use crate::zone::ZoneRegistry;
use crate::{service, Result};
use deadpool_sqlite::Pool;
use serde::Serialize;

#[derive(Serialize)]
pub struct Res {
    pub loaded: usize,
    pub version: u64,
}

pub async fn run(registry: &ZoneRegistry, pool: &Pool) -> Result<Res> {
    let loaded = service::zone::refresh(registry, pool).await?;
    Ok(Res {
        loaded,
        version: registry.snapshot().version(),
    })
}
