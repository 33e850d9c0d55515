//! Checkin repository implementation.
//!
//! Terminal transitions are guarded on `status IN ('active', 'extended')`
//! so that the user-initiated early checkout and the scheduler-initiated
//! auto-checkout are mutually exclusive: whichever write lands first wins,
//! the other sees zero rows affected.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stayhub_core::error::{AppError, ErrorKind};
use stayhub_core::result::AppResult;
use stayhub_entity::checkin::{
    Checkin, CheckinExtension, CheckinStatus, CreateCheckin, CreateCheckinExtension,
};

/// Repository for checkin CRUD, guarded transitions, and history queries.
#[derive(Debug, Clone)]
pub struct CheckinRepository {
    pool: PgPool,
}

impl CheckinRepository {
    /// Create a new checkin repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a checkin by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Checkin>> {
        sqlx::query_as::<_, Checkin>("SELECT * FROM checkins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find checkin", e))
    }

    /// Find the in-house (active or extended) checkin for a unit, if any.
    pub async fn find_in_house_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        sqlx::query_as::<_, Checkin>(
            "SELECT * FROM checkins WHERE unit_id = $1 AND status IN ('active', 'extended') \
             ORDER BY created_at DESC LIMIT 1",
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find in-house checkin", e)
        })
    }

    /// Find the most recent checkin for a unit regardless of status.
    pub async fn find_latest_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        sqlx::query_as::<_, Checkin>(
            "SELECT * FROM checkins WHERE unit_id = $1 ORDER BY updated_at DESC LIMIT 1",
        )
        .bind(unit_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find latest checkin", e)
        })
    }

    /// List all in-house checkins whose checkout time has passed.
    pub async fn find_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Checkin>> {
        sqlx::query_as::<_, Checkin>(
            "SELECT * FROM checkins WHERE status IN ('active', 'extended') \
             AND checkout_time <= $1 ORDER BY checkout_time ASC",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list due checkins", e))
    }

    /// Create a new checkin.
    pub async fn create(&self, data: &CreateCheckin) -> AppResult<Checkin> {
        sqlx::query_as::<_, Checkin>(
            "INSERT INTO checkins (unit_id, apartment_id, team_id, duration_hours, \
             checkout_time, payment_method, payment_amount, marketing_name, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(data.unit_id)
        .bind(data.apartment_id)
        .bind(data.team_id)
        .bind(data.duration_hours)
        .bind(data.checkout_time)
        .bind(&data.payment_method)
        .bind(data.payment_amount)
        .bind(&data.marketing_name)
        .bind(&data.notes)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create checkin", e))
    }

    /// Move an in-house checkin into a terminal state.
    ///
    /// Returns whether the write took effect; a miss means the checkin was
    /// already closed by a concurrent actor.
    pub async fn complete_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE checkins SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('active', 'extended')",
        )
        .bind(id)
        .bind(terminal_status)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete checkin", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Move a due, in-house checkin into a terminal state on behalf of
    /// the scheduler.
    ///
    /// The due-ness condition is part of the guard: an extension granted
    /// after the scheduler listed the row pushes `checkout_time` past
    /// `now`, so this write misses instead of closing a stay that is no
    /// longer due.
    pub async fn complete_due_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE checkins SET status = $2, updated_at = NOW() \
             WHERE id = $1 AND status IN ('active', 'extended') AND checkout_time <= $3",
        )
        .bind(id)
        .bind(terminal_status)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to complete due checkin", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Advance the checkout time of an in-house checkin and mark it extended.
    ///
    /// Guarded on the previous checkout time so two concurrent extends
    /// cannot both apply against the same base.
    pub async fn extend_guarded(
        &self,
        id: Uuid,
        expected_checkout_time: DateTime<Utc>,
        new_checkout_time: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE checkins SET status = 'extended', checkout_time = $3, updated_at = NOW() \
             WHERE id = $1 AND status IN ('active', 'extended') AND checkout_time = $2",
        )
        .bind(id)
        .bind(expected_checkout_time)
        .bind(new_checkout_time)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to extend checkin", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Append an extension record.
    pub async fn create_extension(
        &self,
        data: &CreateCheckinExtension,
    ) -> AppResult<CheckinExtension> {
        sqlx::query_as::<_, CheckinExtension>(
            "INSERT INTO checkin_extensions (checkin_id, additional_hours, new_checkout_time, \
             payment_method, payment_amount, notes, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(data.checkin_id)
        .bind(data.additional_hours)
        .bind(data.new_checkout_time)
        .bind(&data.payment_method)
        .bind(data.payment_amount)
        .bind(&data.notes)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record extension", e)
        })
    }

    /// List the extension history for a checkin, oldest first.
    pub async fn find_extensions(&self, checkin_id: Uuid) -> AppResult<Vec<CheckinExtension>> {
        sqlx::query_as::<_, CheckinExtension>(
            "SELECT * FROM checkin_extensions WHERE checkin_id = $1 ORDER BY created_at ASC",
        )
        .bind(checkin_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list extensions", e))
    }
}
