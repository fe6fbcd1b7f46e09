use crate::zone::{TariffBand, Zone};
use crate::{Error, Result};

/// Picks the band covering `distance_km` and prices it. Validated zones always
/// have exactly one such band, so a miss means the zone data is corrupted.
pub fn quote(zone: &Zone, distance_km: f64) -> Result<(&TariffBand, f64)> {
    let mut matching = zone.tariff_bands.iter().filter(|it| it.matches(distance_km));
    match (matching.next(), matching.next()) {
        (Some(band), None) => Ok((band, band.cost(distance_km))),
        _ => Err(Error::BandNotFound {
            zone_id: zone.id,
            distance_km,
        }),
    }
}
