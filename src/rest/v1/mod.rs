pub mod quote;
pub mod zones;
