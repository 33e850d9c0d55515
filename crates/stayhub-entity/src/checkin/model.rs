//! Checkin entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::CheckinStatus;

/// One guest stay in a unit.
///
/// Checkins are never deleted; terminal records feed reconciliation and
/// reporting. `checkout_time` only ever moves forward (extensions).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Checkin {
    /// Unique checkin identifier.
    pub id: Uuid,
    /// The unit being occupied.
    pub unit_id: Uuid,
    /// The apartment the unit belongs to (denormalized for reporting).
    pub apartment_id: Uuid,
    /// The field team that handled the checkin, if any.
    pub team_id: Option<Uuid>,
    /// Current lifecycle status.
    pub status: CheckinStatus,
    /// Originally booked duration in hours.
    pub duration_hours: i32,
    /// When the stay ends; advanced forward by extensions.
    pub checkout_time: DateTime<Utc>,
    /// Payment method label (cash, transfer, ...). Opaque to the engine.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit. Opaque to the engine.
    pub payment_amount: Option<i64>,
    /// Marketing attribution name. Opaque to the engine.
    pub marketing_name: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user who created the checkin.
    pub created_by: Uuid,
    /// When the checkin was created.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Checkin {
    /// Check whether the guest currently holds the unit.
    pub fn is_in_house(&self) -> bool {
        self.status.is_in_house()
    }

    /// Check whether the checkout time has passed at `now`.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.checkout_time
    }
}

/// Data required to create a new checkin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckin {
    /// The unit being occupied.
    pub unit_id: Uuid,
    /// The apartment the unit belongs to.
    pub apartment_id: Uuid,
    /// The field team handling the checkin, if any.
    pub team_id: Option<Uuid>,
    /// Booked duration in hours.
    pub duration_hours: i32,
    /// Computed checkout time (`created_at + duration_hours`).
    pub checkout_time: DateTime<Utc>,
    /// Payment method label.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit.
    pub payment_amount: Option<i64>,
    /// Marketing attribution name.
    pub marketing_name: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user creating the checkin.
    pub created_by: Uuid,
}
