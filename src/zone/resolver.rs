use super::model::Zone;
use super::registry::ZoneSnapshot;
use crate::geometry::{self, Coordinate};
use std::sync::Arc;
use strum::Display;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum MatchKind {
    Hint,
    Polygon,
    Radius,
}

#[derive(Debug, Clone)]
pub struct ZoneMatch {
    pub zone: Arc<Zone>,
    pub kind: MatchKind,
}

impl ZoneMatch {
    pub fn covered_by_polygon(&self) -> bool {
        self.kind != MatchKind::Radius
    }
}

/// Polygon match first (hinted zone, then ascending id), then the closest
/// centroid within its coverage radius. `None` means the coordinate is uncovered.
pub fn resolve(
    snapshot: &ZoneSnapshot,
    coordinate: &Coordinate,
    zone_hint: Option<i64>,
) -> Option<ZoneMatch> {
    if let Some(hint) = zone_hint {
        match snapshot.get(hint) {
            Some(zone) if zone.active && geometry::contains(&zone.polygon, coordinate) => {
                return Some(ZoneMatch {
                    zone: zone.clone(),
                    kind: MatchKind::Hint,
                });
            }
            _ => debug!(zone_hint = hint, "Zone hint didn't match, scanning all zones"),
        }
    }

    if let Some(zone) = snapshot
        .active_zones()
        .find(|it| geometry::contains(&it.polygon, coordinate))
    {
        return Some(ZoneMatch {
            zone: zone.clone(),
            kind: MatchKind::Polygon,
        });
    }

    let mut closest: Option<(f64, &Arc<Zone>)> = None;
    for zone in snapshot.active_zones() {
        let distance = geometry::distance_km(coordinate, &zone.centroid);
        if distance > zone.coverage_radius_km {
            continue;
        }
        // strict comparison keeps the lowest id on ties
        if closest.map_or(true, |(best, _)| distance < best) {
            closest = Some((distance, zone));
        }
    }
    closest.map(|(_, zone)| ZoneMatch {
        zone: zone.clone(),
        kind: MatchKind::Radius,
    })
}
