// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod index;
pub mod maintenance;
pub mod session;

pub use index::*;
pub use maintenance::*;
pub use session::*;
