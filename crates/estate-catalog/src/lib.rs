pub mod admin;
pub mod config;
pub mod error;
pub mod listings;
pub mod storefront;
pub mod telemetry;
