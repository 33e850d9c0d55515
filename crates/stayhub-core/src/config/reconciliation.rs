//! Reconciliation sweep configuration.

use serde::{Deserialize, Serialize};

/// Reconciliation sweep settings.
///
/// The thresholds are deliberately generous compared to the normal
/// cleaning budget so the sweep never fights the scheduler over units
/// that are merely slow, only over units that are genuinely stuck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationConfig {
    /// Minutes after which a `Cleaning` unit with no updates is considered
    /// stuck and forced back to `Available`.
    #[serde(default = "default_stuck_threshold")]
    pub stuck_cleaning_threshold_minutes: i64,
    /// If the most recent checkin for an orphaned `Occupied` unit reached a
    /// terminal state within this many minutes, the unit is repaired to
    /// `Cleaning` instead of `Available`.
    #[serde(default = "default_orphan_recency")]
    pub orphan_cleaning_recency_minutes: i64,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            stuck_cleaning_threshold_minutes: default_stuck_threshold(),
            orphan_cleaning_recency_minutes: default_orphan_recency(),
        }
    }
}

fn default_stuck_threshold() -> i64 {
    120
}

fn default_orphan_recency() -> i64 {
    45
}
