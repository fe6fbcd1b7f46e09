pub mod deactivate_zone;
pub mod get_active_zones;
pub mod get_zone;
pub mod handler;
pub mod quote;
pub mod refresh_zones;
pub mod upsert_zone;
