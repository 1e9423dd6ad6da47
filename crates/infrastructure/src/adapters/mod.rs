//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod metar_feed_adapter;

pub use metar_feed_adapter::MetarFeedAdapter;
