//! Unit repository implementation.
//!
//! Status writes are compare-and-set: the `WHERE status = $expected`
//! clause is the optimistic-concurrency guard, and `rows_affected()`
//! tells the caller whether the write won.

use sqlx::PgPool;
use uuid::Uuid;

use stayhub_core::error::{AppError, ErrorKind};
use stayhub_core::result::AppResult;
use stayhub_entity::unit::{Unit, UnitStatus, UnitStatusChange};

/// Repository for unit reads and guarded status updates.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    pool: PgPool,
}

impl UnitRepository {
    /// Create a new unit repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a unit by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Unit>> {
        sqlx::query_as::<_, Unit>("SELECT * FROM units WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find unit", e))
    }

    /// List all units currently in cleaning, oldest cycle first.
    pub async fn find_cleaning(&self) -> AppResult<Vec<Unit>> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE status = 'cleaning' ORDER BY cleaning_started_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list cleaning units", e))
    }

    /// List all units that are not available (occupied, cleaning, maintenance).
    pub async fn find_non_available(&self) -> AppResult<Vec<Unit>> {
        sqlx::query_as::<_, Unit>(
            "SELECT * FROM units WHERE status != 'available' ORDER BY updated_at ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list non-available units", e)
        })
    }

    /// Apply a status change only if the persisted status equals `expected`.
    ///
    /// Returns whether the write took effect. Zero rows affected means the
    /// guard missed (another writer got there first) and is not an error.
    pub async fn update_status_guarded(
        &self,
        id: Uuid,
        expected: UnitStatus,
        change: &UnitStatusChange,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE units SET status = $3, cleaning_started_at = $4, \
             cleaning_extended_minutes = $5, updated_at = NOW() \
             WHERE id = $1 AND status = $2",
        )
        .bind(id)
        .bind(expected)
        .bind(change.status)
        .bind(change.cleaning_started_at)
        .bind(change.cleaning_extended_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update unit status", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Raise `cleaning_extended_minutes` only if the persisted value still
    /// equals `expected_minutes` and the unit is still in cleaning.
    ///
    /// The guard on the previous value makes concurrent extends serialize:
    /// the loser sees zero rows affected and must re-read.
    pub async fn update_cleaning_extension_guarded(
        &self,
        id: Uuid,
        expected_minutes: i32,
        new_minutes: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE units SET cleaning_extended_minutes = $3, updated_at = NOW() \
             WHERE id = $1 AND status = 'cleaning' AND cleaning_extended_minutes = $2",
        )
        .bind(id)
        .bind(expected_minutes)
        .bind(new_minutes)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to extend cleaning timer", e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
