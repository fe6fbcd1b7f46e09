use crate::geometry::Coordinate;
use crate::zone::{TariffBand, Zone};

pub const NATIONAL_ZONE_ID: i64 = 1;

/// Country-wide delivery zone for the Dominican Republic. The ring is a coarse
/// outline of the coast, pricing is anchored at Santo Domingo.
pub fn national_zone() -> Zone {
    Zone {
        id: NATIONAL_ZONE_ID,
        name: "Zona Nacional RD".into(),
        description: "Cobertura nacional con tarifa por distancia".into(),
        color: "#1e88e5".into(),
        active: true,
        polygon: [
            (19.70, -71.75),
            (19.90, -70.50),
            (19.35, -69.30),
            (18.65, -68.35),
            (18.20, -68.70),
            (18.42, -69.90),
            (18.20, -70.55),
            (17.60, -71.40),
            (18.05, -71.75),
            (19.70, -71.75),
        ]
        .into_iter()
        .map(|(lat, lon)| Coordinate::new(lat, lon))
        .collect(),
        centroid: Coordinate::new(18.486057, -69.931211),
        coverage_radius_km: 250.0,
        tariff_bands: vec![
            band(0.0, Some(30.0), 4.0, 0.35),
            band(30.0, Some(120.0), 10.0, 0.30),
            band(120.0, None, 18.0, 0.25),
        ],
    }
}

fn band(min: f64, max: Option<f64>, base_cost: f64, cost_per_km: f64) -> TariffBand {
    TariffBand {
        distance_min_km: min,
        distance_max_km: max,
        base_cost,
        cost_per_km,
        surcharge: 0.0,
    }
}

#[cfg(test)]
mod test {
    use super::national_zone;
    use crate::geometry::{self, Coordinate};
    use crate::Result;

    #[test]
    fn national_zone_is_valid() -> Result<()> {
        national_zone().validated()?;
        Ok(())
    }

    #[test]
    fn polygon_covers_santo_domingo() {
        let zone = national_zone();
        assert!(geometry::contains(&zone.polygon, &zone.centroid));
        assert!(geometry::contains(
            &zone.polygon,
            &Coordinate::new(18.485, -69.934)
        ));
        // Santiago de los Caballeros
        assert!(geometry::contains(
            &zone.polygon,
            &Coordinate::new(19.4517, -70.6970)
        ));
        // Caribbean sea, south of the capital
        assert!(!geometry::contains(
            &zone.polygon,
            &Coordinate::new(18.0, -69.93)
        ));
    }
}
