//! Sweep result reporting.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stayhub_entity::unit::UnitStatus;

/// One repaired unit, with its before/after status for audit purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRepair {
    /// The repaired unit.
    pub unit_id: Uuid,
    /// Human-facing unit number.
    pub unit_number: String,
    /// Status before the repair.
    pub from_status: UnitStatus,
    /// Status after the repair.
    pub to_status: UnitStatus,
}

/// Outcome of one reconciliation sweep.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SweepReport {
    /// How many non-available units were examined.
    pub scanned: usize,
    /// Occupied units with no in-house checkin that were repaired.
    pub orphaned_occupied_repaired: Vec<UnitRepair>,
    /// Cleaning units past the stuck threshold that were repaired.
    pub stuck_cleaning_repaired: Vec<UnitRepair>,
    /// Rows skipped because a store error prevented examining them.
    pub skipped: usize,
}

impl SweepReport {
    /// Total number of repairs applied.
    pub fn total_repaired(&self) -> usize {
        self.orphaned_occupied_repaired.len() + self.stuck_cleaning_repaired.len()
    }

    /// Whether the sweep found nothing to repair.
    pub fn is_clean(&self) -> bool {
        self.total_repaired() == 0
    }
}
