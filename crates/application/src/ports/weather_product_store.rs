//! Weather product store port
//!
//! Key-value persistence for cached weather products. Implementations may
//! keep entries in memory (Moka) or in an embedded database (redb).

use async_trait::async_trait;
use domain::WeatherProduct;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for reading and writing cached weather products
///
/// Each `save` replaces the whole entry at once, so concurrent readers see
/// either the previous or the new product, never a mix.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WeatherProductStore: Send + Sync {
    /// Look up a product by its unique key
    async fn find_by_key(&self, key: &str) -> Result<Option<WeatherProduct>, ApplicationError>;

    /// Insert or replace the product stored under `product.key`
    async fn save(&self, product: WeatherProduct) -> Result<WeatherProduct, ApplicationError>;
}
