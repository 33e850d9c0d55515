//! Persistence gateway traits.
//!
//! The services talk to storage through these traits rather than the sqlx
//! repositories directly, so that the time-driven and concurrency-heavy
//! paths can be tested against an in-memory store. The traits mirror the
//! repository surface exactly; production wiring uses the blanket impls
//! for [`UnitRepository`] and [`CheckinRepository`] below.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use stayhub_core::result::AppResult;
use stayhub_database::repositories::checkin::CheckinRepository;
use stayhub_database::repositories::unit::UnitRepository;
use stayhub_entity::checkin::{
    Checkin, CheckinExtension, CheckinStatus, CreateCheckin, CreateCheckinExtension,
};
use stayhub_entity::unit::{Unit, UnitStatus, UnitStatusChange};

/// Gateway for unit reads and guarded status writes.
///
/// All `*_guarded` methods return whether the write applied; a guard miss
/// is `Ok(false)`, never an error.
#[async_trait]
pub trait UnitStore: Send + Sync + std::fmt::Debug {
    /// Fetch a unit by ID.
    async fn get_unit(&self, id: Uuid) -> AppResult<Option<Unit>>;

    /// List all units currently in `Cleaning`, oldest cycle first.
    async fn list_cleaning_units(&self) -> AppResult<Vec<Unit>>;

    /// List all units whose status is not `Available`.
    async fn list_non_available_units(&self) -> AppResult<Vec<Unit>>;

    /// Apply `change` only if the persisted status equals `expected`.
    async fn update_status_guarded(
        &self,
        id: Uuid,
        expected: UnitStatus,
        change: UnitStatusChange,
    ) -> AppResult<bool>;

    /// Raise the cleaning extension counter only if it still equals
    /// `expected_minutes` and the unit is still in cleaning.
    async fn update_cleaning_extension_guarded(
        &self,
        id: Uuid,
        expected_minutes: i32,
        new_minutes: i32,
    ) -> AppResult<bool>;
}

/// Gateway for checkin reads, creation, and guarded transitions.
#[async_trait]
pub trait CheckinStore: Send + Sync + std::fmt::Debug {
    /// Fetch a checkin by ID.
    async fn get_checkin(&self, id: Uuid) -> AppResult<Option<Checkin>>;

    /// Durably create a new checkin.
    async fn insert_checkin(&self, data: CreateCheckin) -> AppResult<Checkin>;

    /// Find the in-house (active or extended) checkin for a unit, if any.
    async fn find_in_house_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>>;

    /// Find the most recent checkin for a unit regardless of status.
    async fn find_latest_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>>;

    /// List all in-house checkins whose checkout time has passed.
    async fn list_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Checkin>>;

    /// Move an in-house checkin into a terminal state; guard is
    /// `status IN (active, extended)`.
    async fn complete_guarded(&self, id: Uuid, terminal_status: CheckinStatus)
        -> AppResult<bool>;

    /// Like [`complete_guarded`](Self::complete_guarded), but the write
    /// additionally requires `checkout_time <= now`, so a concurrent
    /// extension defeats it.
    async fn complete_due_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Advance the checkout time and mark the checkin extended; guarded on
    /// the previous checkout time.
    async fn extend_guarded(
        &self,
        id: Uuid,
        expected_checkout_time: DateTime<Utc>,
        new_checkout_time: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Append an extension record.
    async fn insert_extension(
        &self,
        data: CreateCheckinExtension,
    ) -> AppResult<CheckinExtension>;

    /// List the extension history for a checkin, oldest first.
    async fn list_extensions(&self, checkin_id: Uuid) -> AppResult<Vec<CheckinExtension>>;
}

#[async_trait]
impl UnitStore for UnitRepository {
    async fn get_unit(&self, id: Uuid) -> AppResult<Option<Unit>> {
        self.find_by_id(id).await
    }

    async fn list_cleaning_units(&self) -> AppResult<Vec<Unit>> {
        self.find_cleaning().await
    }

    async fn list_non_available_units(&self) -> AppResult<Vec<Unit>> {
        self.find_non_available().await
    }

    async fn update_status_guarded(
        &self,
        id: Uuid,
        expected: UnitStatus,
        change: UnitStatusChange,
    ) -> AppResult<bool> {
        UnitRepository::update_status_guarded(self, id, expected, &change).await
    }

    async fn update_cleaning_extension_guarded(
        &self,
        id: Uuid,
        expected_minutes: i32,
        new_minutes: i32,
    ) -> AppResult<bool> {
        UnitRepository::update_cleaning_extension_guarded(self, id, expected_minutes, new_minutes)
            .await
    }
}

#[async_trait]
impl CheckinStore for CheckinRepository {
    async fn get_checkin(&self, id: Uuid) -> AppResult<Option<Checkin>> {
        self.find_by_id(id).await
    }

    async fn insert_checkin(&self, data: CreateCheckin) -> AppResult<Checkin> {
        self.create(&data).await
    }

    async fn find_in_house_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        CheckinRepository::find_in_house_by_unit(self, unit_id).await
    }

    async fn find_latest_by_unit(&self, unit_id: Uuid) -> AppResult<Option<Checkin>> {
        CheckinRepository::find_latest_by_unit(self, unit_id).await
    }

    async fn list_due(&self, now: DateTime<Utc>) -> AppResult<Vec<Checkin>> {
        self.find_due(now).await
    }

    async fn complete_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
    ) -> AppResult<bool> {
        CheckinRepository::complete_guarded(self, id, terminal_status).await
    }

    async fn complete_due_guarded(
        &self,
        id: Uuid,
        terminal_status: CheckinStatus,
        now: DateTime<Utc>,
    ) -> AppResult<bool> {
        CheckinRepository::complete_due_guarded(self, id, terminal_status, now).await
    }

    async fn extend_guarded(
        &self,
        id: Uuid,
        expected_checkout_time: DateTime<Utc>,
        new_checkout_time: DateTime<Utc>,
    ) -> AppResult<bool> {
        CheckinRepository::extend_guarded(self, id, expected_checkout_time, new_checkout_time)
            .await
    }

    async fn insert_extension(
        &self,
        data: CreateCheckinExtension,
    ) -> AppResult<CheckinExtension> {
        self.create_extension(&data).await
    }

    async fn list_extensions(&self, checkin_id: Uuid) -> AppResult<Vec<CheckinExtension>> {
        self.find_extensions(checkin_id).await
    }
}
