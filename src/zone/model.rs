use crate::geometry::Coordinate;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: String,
    #[serde(default = "default_active")]
    pub active: bool,
    pub polygon: Vec<Coordinate>,
    pub centroid: Coordinate,
    pub coverage_radius_km: f64,
    pub tariff_bands: Vec<TariffBand>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffBand {
    pub distance_min_km: f64,
    /// `None` marks the open-ended terminal band
    pub distance_max_km: Option<f64>,
    pub base_cost: f64,
    pub cost_per_km: f64,
    #[serde(default)]
    pub surcharge: f64,
}

impl TariffBand {
    pub fn matches(&self, distance_km: f64) -> bool {
        if !distance_km.is_finite() || distance_km < self.distance_min_km {
            return false;
        }
        match self.distance_max_km {
            Some(max) => distance_km < max,
            None => true,
        }
    }

    pub fn cost(&self, distance_km: f64) -> f64 {
        self.base_cost + self.cost_per_km * distance_km + self.surcharge
    }

    pub fn is_unbounded(&self) -> bool {
        self.distance_max_km.is_none()
    }
}

impl Zone {
    /// Returns a copy with bands sorted by lower bound, rejecting any zone the
    /// resolver or the calculator couldn't work with.
    pub fn validated(mut self) -> Result<Zone> {
        let id = self.id;
        let invalid =
            move |message: String| Error::InvalidZoneConfig(format!("zone {id}: {message}"));
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if self.polygon.len() < 4 {
            return Err(invalid(format!(
                "polygon needs at least 4 coordinates, got {}",
                self.polygon.len()
            )));
        }
        if self.polygon.first() != self.polygon.last() {
            return Err(invalid("polygon ring is not closed".into()));
        }
        if let Some(it) = self.polygon.iter().find(|it| !it.is_valid()) {
            return Err(invalid(format!(
                "polygon coordinate out of range: {}, {}",
                it.latitude, it.longitude
            )));
        }
        if !self.centroid.is_valid() {
            return Err(invalid("centroid is out of range".into()));
        }
        if !self.coverage_radius_km.is_finite() || self.coverage_radius_km <= 0.0 {
            return Err(invalid(format!(
                "coverage radius must be positive, got {}",
                self.coverage_radius_km
            )));
        }
        self.tariff_bands.sort_by(|a, b| a.distance_min_km.total_cmp(&b.distance_min_km));
        validate_bands(&self.tariff_bands).map_err(invalid)?;
        Ok(self)
    }
}

fn validate_bands(bands: &[TariffBand]) -> std::result::Result<(), String> {
    let Some(first) = bands.first() else {
        return Err("no tariff bands".into());
    };
    if first.distance_min_km != 0.0 {
        return Err(format!(
            "first band must start at 0 km, got {}",
            first.distance_min_km
        ));
    }
    for band in bands {
        let amounts = [
            band.distance_min_km,
            band.base_cost,
            band.cost_per_km,
            band.surcharge,
        ];
        if amounts.iter().any(|it| !it.is_finite() || *it < 0.0) {
            return Err(format!(
                "band starting at {} km has a negative or non-finite value",
                band.distance_min_km
            ));
        }
        if let Some(max) = band.distance_max_km {
            if !max.is_finite() || max <= band.distance_min_km {
                return Err(format!(
                    "band {}-{} km is empty or inverted",
                    band.distance_min_km, max
                ));
            }
        }
    }
    let unbounded = bands.iter().filter(|it| it.is_unbounded()).count();
    if unbounded != 1 {
        return Err(format!("expected exactly 1 unbounded band, got {unbounded}"));
    }
    if !bands[bands.len() - 1].is_unbounded() {
        return Err("unbounded band must be the last one".into());
    }
    for pair in bands.windows(2) {
        let (prev, next) = (&pair[0], &pair[1]);
        // the unbounded band is last, so prev always has an upper bound here
        let Some(prev_max) = prev.distance_max_km else {
            return Err("unbounded band must be the last one".into());
        };
        if prev_max < next.distance_min_km {
            return Err(format!(
                "gap between {} km and {} km",
                prev_max, next.distance_min_km
            ));
        }
        if prev_max > next.distance_min_km {
            return Err(format!(
                "bands overlap between {} km and {} km",
                next.distance_min_km, prev_max
            ));
        }
        if next.cost(prev_max) < prev.cost(prev_max) {
            return Err(format!("price drops at the {prev_max} km boundary"));
        }
    }
    Ok(())
}
