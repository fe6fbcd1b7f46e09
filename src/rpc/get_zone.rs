use crate::zone::{Zone, ZoneRegistry};
use crate::Result;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub id: i64,
}

pub fn run(params: Params, registry: &ZoneRegistry) -> Result<Zone> {
    registry.get(params.id)
}
