use super::model::Zone;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{error, info, warn};

/// Immutable view of every known zone. Quotes work on a single snapshot, so a
/// concurrent upsert can never hand them a half-updated zone.
#[derive(Debug, Default)]
pub struct ZoneSnapshot {
    version: u64,
    zones: BTreeMap<i64, Arc<Zone>>,
}

impl ZoneSnapshot {
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn get(&self, id: i64) -> Option<&Arc<Zone>> {
        self.zones.get(&id)
    }

    /// Active zones in ascending id order
    pub fn active_zones(&self) -> impl Iterator<Item = &Arc<Zone>> {
        self.zones.values().filter(|it| it.active)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct ZoneRegistry {
    current: RwLock<Arc<ZoneSnapshot>>,
    writer: Mutex<()>,
    // held across the database round trip of every persisted mutation
    admin: tokio::sync::Mutex<()>,
}

impl ZoneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes persisted mutations end to end. Callers writing to the
    /// database and then publishing here must hold the guard for both steps.
    pub async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.admin.lock().await
    }

    pub fn snapshot(&self) -> Arc<ZoneSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, id: i64) -> Result<Zone> {
        self.snapshot()
            .get(id)
            .map(|it| it.as_ref().clone())
            .ok_or_else(|| Error::NotFound(format!("Zone with id = {id} doesn't exist")))
    }

    pub fn active_zones(&self) -> Vec<Zone> {
        self.snapshot()
            .active_zones()
            .map(|it| it.as_ref().clone())
            .collect()
    }

    pub fn upsert(&self, zone: Zone) -> Result<Zone> {
        let zone = zone.validated()?;
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let mut zones = self.snapshot().zones.clone();
        zones.insert(zone.id, Arc::new(zone.clone()));
        let version = self.publish(zones);
        info!(zone_id = zone.id, version, "Zone upserted");
        Ok(zone)
    }

    pub fn deactivate(&self, id: i64) -> Result<Zone> {
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot();
        let zone = snapshot
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("Zone with id = {id} doesn't exist")))?;
        if !zone.active {
            return Ok(zone.as_ref().clone());
        }
        let zone = Zone {
            active: false,
            ..zone.as_ref().clone()
        };
        let mut zones = snapshot.zones.clone();
        zones.insert(id, Arc::new(zone.clone()));
        let version = self.publish(zones);
        info!(zone_id = id, version, "Zone deactivated");
        Ok(zone)
    }

    /// Rebuilds the registry from a full set of definitions. Invalid definitions
    /// are skipped, returns the number of zones loaded.
    pub fn replace_all(&self, zones: Vec<Zone>) -> usize {
        let mut valid = BTreeMap::new();
        for zone in zones {
            let id = zone.id;
            match zone.validated() {
                Ok(zone) => {
                    if valid.insert(id, Arc::new(zone)).is_some() {
                        warn!(zone_id = id, "Duplicate zone definition, keeping the last one");
                    }
                }
                Err(e) => error!(zone_id = id, error = %e, "Skipping invalid zone"),
            }
        }
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let loaded = valid.len();
        let version = self.publish(valid);
        info!(loaded, version, "Zone registry rebuilt");
        loaded
    }

    // callers must hold the writer lock
    fn publish(&self, zones: BTreeMap<i64, Arc<Zone>>) -> u64 {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let version = current.version + 1;
        *current = Arc::new(ZoneSnapshot { version, zones });
        version
    }
}
