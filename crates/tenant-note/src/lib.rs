pub mod config;
pub mod error;
pub mod listings;
pub mod regions;
pub mod telemetry;
