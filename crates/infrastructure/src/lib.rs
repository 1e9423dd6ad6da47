//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer: weather product
//! stores, the upstream feed adapter, layered configuration and the cron
//! scheduler that drives periodic refreshes.

pub mod adapters;
pub mod cache;
pub mod config;
pub mod scheduled_tasks;
pub mod scheduler;

pub use adapters::*;
pub use cache::{MokaProductStore, RedbProductStore, StoreStats, build_product_store};
pub use config::{AppConfig, CacheBackend, CacheConfig, RefreshConfig, ServerConfig, StationsConfig};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats, schedules};
