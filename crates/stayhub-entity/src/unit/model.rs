//! Unit entity model.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::UnitStatus;

/// A rentable room inside an apartment.
///
/// `status` is a cached projection of the checkin history; the invariant
/// is that `cleaning_started_at` is non-null iff `status == Cleaning`,
/// and `cleaning_extended_minutes` is reset whenever cleaning ends.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Unit {
    /// Unique unit identifier.
    pub id: Uuid,
    /// The apartment this unit belongs to.
    pub apartment_id: Uuid,
    /// Human-facing unit number, unique within the apartment.
    pub unit_number: String,
    /// Cached occupancy status.
    pub status: UnitStatus,
    /// When the current cleaning cycle started.
    pub cleaning_started_at: Option<DateTime<Utc>>,
    /// Cumulative extension granted during the current cleaning cycle.
    pub cleaning_extended_minutes: i32,
    /// When the unit was created.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Unit {
    /// Check whether the unit can accept a new checkin.
    pub fn is_available(&self) -> bool {
        self.status == UnitStatus::Available
    }

    /// Total cleaning budget for the current cycle, in minutes.
    pub fn cleaning_budget_minutes(&self, base_duration_minutes: i64) -> i64 {
        base_duration_minutes + i64::from(self.cleaning_extended_minutes)
    }

    /// The instant the current cleaning cycle's budget elapses.
    ///
    /// `None` when the unit is not in cleaning.
    pub fn cleaning_deadline(&self, base_duration_minutes: i64) -> Option<DateTime<Utc>> {
        self.cleaning_started_at
            .map(|started| started + Duration::minutes(self.cleaning_budget_minutes(base_duration_minutes)))
    }

    /// Whether the cleaning budget has elapsed at `now`.
    pub fn cleaning_elapsed(&self, base_duration_minutes: i64, now: DateTime<Utc>) -> bool {
        match self.cleaning_deadline(base_duration_minutes) {
            Some(deadline) => now >= deadline,
            None => false,
        }
    }
}

/// Field values applied by a guarded unit-status update.
///
/// Bundles the status with the cleaning-timer fields so that every
/// transition keeps the `cleaning_started_at`/`status` invariant in one
/// write.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitStatusChange {
    /// The new status.
    pub status: UnitStatus,
    /// New value for `cleaning_started_at`.
    pub cleaning_started_at: Option<DateTime<Utc>>,
    /// New value for `cleaning_extended_minutes`.
    pub cleaning_extended_minutes: i32,
}

impl UnitStatusChange {
    /// A transition into `Occupied`.
    pub fn occupied() -> Self {
        Self {
            status: UnitStatus::Occupied,
            cleaning_started_at: None,
            cleaning_extended_minutes: 0,
        }
    }

    /// A transition into `Cleaning`, starting the timer at `started_at`.
    pub fn cleaning(started_at: DateTime<Utc>) -> Self {
        Self {
            status: UnitStatus::Cleaning,
            cleaning_started_at: Some(started_at),
            cleaning_extended_minutes: 0,
        }
    }

    /// A transition into `Available`, clearing the cleaning timer.
    pub fn available() -> Self {
        Self {
            status: UnitStatus::Available,
            cleaning_started_at: None,
            cleaning_extended_minutes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_in_cleaning(started_minutes_ago: i64, extended: i32) -> Unit {
        let now = Utc::now();
        Unit {
            id: Uuid::new_v4(),
            apartment_id: Uuid::new_v4(),
            unit_number: "101".to_string(),
            status: UnitStatus::Cleaning,
            cleaning_started_at: Some(now - Duration::minutes(started_minutes_ago)),
            cleaning_extended_minutes: extended,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn budget_includes_extension() {
        let unit = unit_in_cleaning(0, 7);
        assert_eq!(unit.cleaning_budget_minutes(30), 37);
    }

    #[test]
    fn elapsed_respects_extension() {
        let now = Utc::now();
        let unit = unit_in_cleaning(32, 0);
        assert!(unit.cleaning_elapsed(30, now));

        let extended = unit_in_cleaning(32, 10);
        assert!(!extended.cleaning_elapsed(30, now));
    }

    #[test]
    fn no_deadline_outside_cleaning() {
        let now = Utc::now();
        let unit = Unit {
            id: Uuid::new_v4(),
            apartment_id: Uuid::new_v4(),
            unit_number: "102".to_string(),
            status: UnitStatus::Available,
            cleaning_started_at: None,
            cleaning_extended_minutes: 0,
            created_at: now,
            updated_at: now,
        };
        assert!(unit.cleaning_deadline(30).is_none());
        assert!(!unit.cleaning_elapsed(30, now));
    }
}
