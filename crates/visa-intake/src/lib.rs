pub mod admin;
pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
