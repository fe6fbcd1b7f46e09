pub mod db;
pub mod import_zones;
pub mod quote;
pub mod seed;
pub mod server;
