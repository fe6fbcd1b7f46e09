use crate::geometry::{self, Coordinate};
use crate::zone::{resolver, TariffBand, ZoneRegistry};
use crate::{tariff, Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub zone_id: Option<i64>,
    pub distance_km: f64,
    pub applied_band: Option<TariffBand>,
    pub total_cost: f64,
    pub covered_by_polygon: bool,
}

impl Quote {
    pub fn uncovered() -> Self {
        Quote {
            zone_id: None,
            distance_km: 0.0,
            applied_band: None,
            total_cost: 0.0,
            covered_by_polygon: false,
        }
    }

    pub fn is_covered(&self) -> bool {
        self.zone_id.is_some()
    }
}

/// Pricing entry point for checkout. Cheap to clone, every clone shares the
/// same registry.
#[derive(Clone, Default)]
pub struct TariffService {
    registry: Arc<ZoneRegistry>,
}

impl TariffService {
    pub fn new(registry: Arc<ZoneRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    pub fn quote(&self, coordinate: Coordinate, zone_hint: Option<i64>) -> Result<Quote> {
        if !coordinate.is_valid() {
            return Err(Error::InvalidInput(format!(
                "Coordinate out of range: {}, {}",
                coordinate.latitude, coordinate.longitude
            )));
        }
        let snapshot = self.registry.snapshot();
        let Some(zone_match) = resolver::resolve(&snapshot, &coordinate, zone_hint) else {
            debug!(
                lat = coordinate.latitude,
                lon = coordinate.longitude,
                "Coordinate is not covered by any zone"
            );
            return Ok(Quote::uncovered());
        };
        let zone = &zone_match.zone;
        let distance_km = geometry::distance_km(&coordinate, &zone.centroid);
        let (band, total_cost) = tariff::quote(zone, distance_km).inspect_err(|e| {
            error!(
                zone_id = zone.id,
                distance_km,
                snapshot_version = snapshot.version(),
                error = %e,
                "Zone bands don't cover the distance, registry data is corrupted"
            )
        })?;
        debug!(
            zone_id = zone.id,
            distance_km,
            total_cost,
            match_kind = %zone_match.kind,
            "Quoted"
        );
        Ok(Quote {
            zone_id: Some(zone.id),
            distance_km,
            applied_band: Some(band.clone()),
            total_cost,
            covered_by_polygon: zone_match.covered_by_polygon(),
        })
    }
}

#[cfg(test)]
mod test {
    use super::{Quote, TariffService};
    use crate::geometry::Coordinate;
    use crate::seed::{national_zone, NATIONAL_ZONE_ID};
    use crate::test::mock_tariff_service;
    use crate::{Error, Result};

    #[test]
    fn national_zone_inside_polygon() -> Result<()> {
        let service = mock_tariff_service();
        let quote = service.quote(Coordinate::new(18.485, -69.934), None)?;
        assert_eq!(Some(NATIONAL_ZONE_ID), quote.zone_id);
        assert!(quote.covered_by_polygon);
        assert!((quote.distance_km - 0.3).abs() < 0.05, "{}", quote.distance_km);
        assert!((quote.total_cost - 4.11).abs() < 0.01, "{}", quote.total_cost);
        let band = quote.applied_band.unwrap();
        assert_eq!(0.0, band.distance_min_km);
        assert_eq!(Some(30.0), band.distance_max_km);
        Ok(())
    }

    #[test]
    fn national_zone_with_hint() -> Result<()> {
        let service = mock_tariff_service();
        let quote = service.quote(Coordinate::new(18.485, -69.934), Some(NATIONAL_ZONE_ID))?;
        assert_eq!(Some(NATIONAL_ZONE_ID), quote.zone_id);
        assert!(quote.covered_by_polygon);
        Ok(())
    }

    #[test]
    fn national_zone_radius_fallback() -> Result<()> {
        let service = mock_tariff_service();
        // at sea, about 54 km south of the centroid
        let quote = service.quote(Coordinate::new(18.0, -69.93), None)?;
        assert_eq!(Some(NATIONAL_ZONE_ID), quote.zone_id);
        assert!(!quote.covered_by_polygon);
        assert!(quote.distance_km > 50.0 && quote.distance_km < 60.0);
        let band = quote.applied_band.unwrap();
        assert_eq!(30.0, band.distance_min_km);
        assert!((quote.total_cost - (10.0 + 0.30 * quote.distance_km)).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn far_away_is_uncovered() -> Result<()> {
        let service = mock_tariff_service();
        // Caracas
        let quote = service.quote(Coordinate::new(10.4806, -66.9036), None)?;
        assert_eq!(Quote::uncovered(), quote);
        assert!(!quote.is_covered());
        // Kingston, Jamaica
        let quote = service.quote(Coordinate::new(17.9714, -76.7936), Some(NATIONAL_ZONE_ID))?;
        assert_eq!(None, quote.zone_id);
        assert_eq!(0.0, quote.total_cost);
        Ok(())
    }

    #[test]
    fn inactive_zone_is_uncovered() -> Result<()> {
        let service = mock_tariff_service();
        service.registry().deactivate(NATIONAL_ZONE_ID)?;
        let quote = service.quote(Coordinate::new(18.485, -69.934), None)?;
        assert!(!quote.is_covered());
        Ok(())
    }

    #[test]
    fn invalid_coordinate() {
        let service = mock_tariff_service();
        let res = service.quote(Coordinate::new(91.0, 0.0), None);
        assert!(matches!(res, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn empty_registry() -> Result<()> {
        let service = TariffService::default();
        let quote = service.quote(national_zone().centroid, None)?;
        assert!(!quote.is_covered());
        Ok(())
    }
}
