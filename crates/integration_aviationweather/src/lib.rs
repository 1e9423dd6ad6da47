//! AviationWeather.gov integration
//!
//! Client for the `MetarJSON` GeoJSON feed published by the Aviation Weather
//! Center (<https://aviationweather.gov>), plus the parser that turns each
//! feature into a [`domain::Metar`].

pub mod client;
mod models;
pub mod parser;

pub use client::{AviationWeatherClient, AviationWeatherConfig, FeedError, MetarFeedClient};
pub use parser::{ParsedFeed, StationParseError, parse_feature, parse_feed};
