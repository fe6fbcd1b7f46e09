use crate::geometry::Coordinate;
use crate::service::{self, Quote, TariffService};
use crate::zone::ZoneRegistry;
use crate::{Error, Result};
use deadpool_sqlite::Pool;
use std::sync::Arc;
use tracing::warn;

pub async fn run(args: &[String], pool: &Pool) -> Result<Quote> {
    let (Some(lat), Some(lon)) = (args.first(), args.get(1)) else {
        return Err(Error::Cli("Usage: quote <lat> <lon> [zone_hint]".into()));
    };
    let coordinate = Coordinate::new(parse_arg(lat)?, parse_arg(lon)?);
    let zone_hint = match args.get(2) {
        Some(hint) => Some(parse_arg(hint)?),
        None => None,
    };
    let registry = Arc::new(ZoneRegistry::new());
    service::zone::refresh(&registry, pool).await?;
    let quote = TariffService::new(registry).quote(coordinate, zone_hint)?;
    if !quote.is_covered() {
        warn!(lat = coordinate.latitude, lon = coordinate.longitude, "Not covered by any zone");
    }
    println!("{}", serde_json::to_string_pretty(&quote)?);
    Ok(quote)
}

fn parse_arg<T: std::str::FromStr>(arg: &str) -> Result<T> {
    arg.parse()
        .map_err(|_| Error::Cli(format!("Invalid argument: {arg}")))
}
