//! Background scheduler configuration.

use serde::{Deserialize, Serialize};

/// Background scheduler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Whether the scheduler is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Interval in minutes between lifecycle ticks (auto-checkout and
    /// cleaning completion). Must divide 60 evenly.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_minutes: u32,
    /// Interval in minutes between reconciliation sweeps. Must divide 60
    /// evenly, or be a multiple of 60 for hourly-and-slower cadences.
    #[serde(default = "default_reconciliation_interval")]
    pub reconciliation_interval_minutes: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tick_interval_minutes: default_tick_interval(),
            reconciliation_interval_minutes: default_reconciliation_interval(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tick_interval() -> u32 {
    5
}

fn default_reconciliation_interval() -> u32 {
    60
}
