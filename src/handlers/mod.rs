// src/handlers/mod.rs
// DOCUMENTATION: Handlers module organization
// PURPOSE: Re-export handler components

pub mod auth;
pub mod health;
pub mod maintenance;
pub mod places;
pub mod query;

pub use auth::config as auth_config;
pub use health::config as health_config;
pub use health::not_found;
pub use maintenance::config as maintenance_config;
pub use places::config as places_config;
