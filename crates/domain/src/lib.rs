//! Domain layer for the METAR service
//!
//! Contains the weather record model, the cache entry it is persisted in,
//! station identifiers and the attribute vocabulary used for filtering.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
