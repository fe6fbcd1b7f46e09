use crate::zone::{Zone, ZoneRegistry};

pub fn run(registry: &ZoneRegistry) -> Vec<Zone> {
    registry.active_zones()
}
