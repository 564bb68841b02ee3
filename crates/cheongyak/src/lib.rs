pub mod api;
pub mod config;
pub mod error;
pub mod listings;
pub mod money;
pub mod rent;
pub mod telemetry;
