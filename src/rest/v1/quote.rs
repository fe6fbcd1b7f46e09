use crate::geometry::Coordinate;
use crate::service::{Quote, TariffService};
use crate::Error;
use actix_web::get;
use actix_web::web::{Data, Json, Query};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct GetArgs {
    lat: f64,
    lon: f64,
    zone_hint: Option<i64>,
}

#[get("")]
pub async fn get(args: Query<GetArgs>, tariff: Data<TariffService>) -> Result<Json<Quote>, Error> {
    tariff
        .quote(Coordinate::new(args.lat, args.lon), args.zone_hint)
        .map(Json)
}
