//! Scheduled refresh configuration.

use serde::{Deserialize, Serialize};

use super::default_true;
use crate::scheduler::schedules;

/// When the upstream feed is pulled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshConfig {
    /// Whether the cron refresh is registered at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Cron expression (6 fields, seconds first; default: every 5 minutes)
    #[serde(default = "default_cron")]
    pub cron: String,

    /// Start one refresh in the background at startup, alongside the listener
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

fn default_cron() -> String {
    schedules::EVERY_5_MINUTES.to_string()
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron: default_cron(),
            run_on_startup: true,
        }
    }
}
