//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod metar_feed_port;
mod weather_product_store;

#[cfg(test)]
pub use metar_feed_port::MockMetarFeedPort;
pub use metar_feed_port::{MetarBatch, MetarFeedPort};
#[cfg(test)]
pub use weather_product_store::MockWeatherProductStore;
pub use weather_product_store::WeatherProductStore;
