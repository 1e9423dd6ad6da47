//! Domain entities - Objects with identity and lifecycle

mod metar;
mod weather_product;

pub use metar::{Barometer, Ceiling, Cloud, Dewpoint, Metar, Temperature, Visibility, Wind};
pub use weather_product::{METAR_KEY_PREFIX, WeatherProduct, metar_key};
