pub mod model;
pub mod registry;
pub mod resolver;

pub use model::TariffBand;
pub use model::Zone;
pub use registry::ZoneRegistry;
pub use registry::ZoneSnapshot;
