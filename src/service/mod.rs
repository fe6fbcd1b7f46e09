pub mod filesystem;
pub mod quote;
pub mod zone;

pub use quote::Quote;
pub use quote::TariffService;
