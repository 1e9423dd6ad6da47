//! METAR service HTTP presentation layer
//!
//! This crate provides the HTTP API over the cached METAR observations.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, with_middleware};
pub use state::AppState;
