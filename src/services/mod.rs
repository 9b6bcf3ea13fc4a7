// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export the external collaborators and their traits

pub mod google_places_client;
pub mod maintenance_service;
pub mod report;
pub mod supabase_auth;

#[cfg(test)]
pub mod fakes;

pub use google_places_client::*;
pub use maintenance_service::*;
pub use supabase_auth::*;
