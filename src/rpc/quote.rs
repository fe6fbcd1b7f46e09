use crate::geometry::Coordinate;
use crate::service::{Quote, TariffService};
use crate::Result;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Params {
    pub latitude: f64,
    pub longitude: f64,
    pub zone_hint: Option<i64>,
}

pub fn run(params: Params, tariff: &TariffService) -> Result<Quote> {
    tariff.quote(
        Coordinate::new(params.latitude, params.longitude),
        params.zone_hint,
    )
}
