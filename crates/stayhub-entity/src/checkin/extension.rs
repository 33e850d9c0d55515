//! Checkin extension records (append-only).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One granted extension of a stay.
///
/// For a given checkin the `new_checkout_time` values are strictly
/// increasing and the latest entry always equals the parent checkin's
/// current `checkout_time`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CheckinExtension {
    /// Unique extension identifier.
    pub id: Uuid,
    /// The checkin being extended.
    pub checkin_id: Uuid,
    /// How many hours were added.
    pub additional_hours: i32,
    /// The checkout time after this extension.
    pub new_checkout_time: DateTime<Utc>,
    /// Payment method label for the extension payment.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit.
    pub payment_amount: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user who granted the extension.
    pub created_by: Uuid,
    /// When the extension was recorded.
    pub created_at: DateTime<Utc>,
}

/// Data required to record a new extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckinExtension {
    /// The checkin being extended.
    pub checkin_id: Uuid,
    /// How many hours are added.
    pub additional_hours: i32,
    /// The checkout time after this extension.
    pub new_checkout_time: DateTime<Utc>,
    /// Payment method label.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit.
    pub payment_amount: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// The user granting the extension.
    pub created_by: Uuid,
}
