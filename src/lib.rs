pub mod amm;
pub mod config;
pub mod obs;
pub mod telemetry;

pub use amm::types::U256;
