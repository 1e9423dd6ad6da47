//! Application layer - Use cases and orchestration
//!
//! Defines the ports the METAR pipeline depends on (product store, upstream
//! feed) and the two services built on them: scheduled ingestion and
//! on-demand lookup.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
