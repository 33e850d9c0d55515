//! Cleaning timer configuration.

use serde::{Deserialize, Serialize};

/// Cleaning timer settings.
///
/// A unit entering `Cleaning` gets `base_duration_minutes` on the clock;
/// field teams may extend the timer, but never by more than
/// `max_extension_minutes` in total for one cleaning cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Base cleaning duration in minutes.
    #[serde(default = "default_base_duration")]
    pub base_duration_minutes: i64,
    /// Maximum cumulative extension per cleaning cycle, in minutes.
    #[serde(default = "default_max_extension")]
    pub max_extension_minutes: i64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            base_duration_minutes: default_base_duration(),
            max_extension_minutes: default_max_extension(),
        }
    }
}

fn default_base_duration() -> i64 {
    30
}

fn default_max_extension() -> i64 {
    10
}
