// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export repository components

pub mod index_repository;
pub mod table_repository;

pub use index_repository::IndexRepository;
pub use table_repository::TableRepository;
