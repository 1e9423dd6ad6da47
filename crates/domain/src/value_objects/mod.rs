//! Value Objects - Immutable, identity-less domain primitives

mod metar_attribute;
mod station_code;
mod station_list;

pub use metar_attribute::MetarAttribute;
pub use station_code::StationCode;
pub use station_list::StationList;
