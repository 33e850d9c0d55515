//! Checkin lifecycle: creation, extension, early checkout, auto-checkout.
//!
//! Checkin state changes are the source of truth; the unit's cached
//! status is a projection maintained alongside them. A multi-step
//! operation that commits the checkin write but loses the unit write is
//! left for the reconciliation sweep to repair — no rollback is attempted
//! beyond the creation path.

use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stayhub_core::clock::Clock;
use stayhub_core::error::AppError;
use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_entity::checkin::{
    Checkin, CheckinExtension, CheckinStatus, CreateCheckin, CreateCheckinExtension,
};

use crate::audit::{self, AuditEvent, AuditSink};
use crate::store::{CheckinStore, UnitStore};
use crate::unit::UnitStatusProjector;

/// Input for creating a checkin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckinRequest {
    /// The unit to occupy.
    pub unit_id: Uuid,
    /// The field team handling the checkin, if any.
    pub team_id: Option<Uuid>,
    /// Booked duration in hours; must be at least 1.
    pub duration_hours: i32,
    /// Payment method label.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit.
    pub payment_amount: Option<i64>,
    /// Marketing attribution name.
    pub marketing_name: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Input for extending a checkin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendCheckinRequest {
    /// Hours to add; must be at least 1. No upper bound at this layer.
    pub additional_hours: i32,
    /// Payment method label for the extension payment.
    pub payment_method: Option<String>,
    /// Payment amount in the smallest currency unit.
    pub payment_amount: Option<i64>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Checkin lifecycle service.
#[derive(Debug, Clone)]
pub struct CheckinService {
    checkins: Arc<dyn CheckinStore>,
    units: Arc<dyn UnitStore>,
    projector: Arc<UnitStatusProjector>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
}

impl CheckinService {
    /// Create a new checkin service.
    pub fn new(
        checkins: Arc<dyn CheckinStore>,
        units: Arc<dyn UnitStore>,
        projector: Arc<UnitStatusProjector>,
        clock: Arc<dyn Clock>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            checkins,
            units,
            projector,
            clock,
            audit,
        }
    }

    /// Create a new checkin against an available unit.
    ///
    /// The unit-status guard is taken **before** the checkin is durably
    /// created, so a concurrent create against the same unit cannot
    /// succeed twice: only the first `Available -> Occupied` write wins.
    /// If the checkin insert then fails, the occupancy is reverted
    /// best-effort; any residue is healed by reconciliation.
    pub async fn create_checkin(
        &self,
        request: CreateCheckinRequest,
        user_id: Uuid,
    ) -> AppResult<Checkin> {
        if request.duration_hours < 1 {
            return Err(AppError::validation("duration must be at least one hour"));
        }

        let actor = Actor::User(user_id);
        let unit = self
            .units
            .get_unit(request.unit_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Unit {} not found", request.unit_id)))?;

        if !self.projector.occupy(unit.id, actor).await? {
            return Err(AppError::unit_unavailable(format!(
                "Unit {} is not available for checkin",
                unit.unit_number
            )));
        }

        let now = self.clock.now();
        let data = CreateCheckin {
            unit_id: unit.id,
            apartment_id: unit.apartment_id,
            team_id: request.team_id,
            duration_hours: request.duration_hours,
            checkout_time: now + Duration::hours(i64::from(request.duration_hours)),
            payment_method: request.payment_method,
            payment_amount: request.payment_amount,
            marketing_name: request.marketing_name,
            notes: request.notes,
            created_by: user_id,
        };

        let checkin = match self.checkins.insert_checkin(data).await {
            Ok(checkin) => checkin,
            Err(e) => {
                if let Err(revert) = self.projector.release_occupancy(unit.id, actor).await {
                    tracing::warn!(
                        unit_id = %unit.id,
                        "Failed to revert occupancy after checkin insert failure: {}",
                        revert
                    );
                }
                return Err(e);
            }
        };

        audit::emit(
            self.audit.as_ref(),
            AuditEvent::checkin_transition(
                actor,
                unit.id,
                checkin.id,
                None,
                CheckinStatus::Active,
                now,
            ),
        )
        .await;

        Ok(checkin)
    }

    /// Extend an in-house checkin, advancing its checkout time forward.
    pub async fn extend_checkin(
        &self,
        checkin_id: Uuid,
        request: ExtendCheckinRequest,
        user_id: Uuid,
    ) -> AppResult<CheckinExtension> {
        if request.additional_hours < 1 {
            return Err(AppError::validation("extension must be at least one hour"));
        }

        let actor = Actor::User(user_id);
        let checkin = self.get_required(checkin_id).await?;
        if !checkin.is_in_house() {
            return Err(AppError::checkin_not_active(format!(
                "Checkin {checkin_id} is already closed"
            )));
        }

        let new_checkout_time =
            checkin.checkout_time + Duration::hours(i64::from(request.additional_hours));

        let applied = self
            .checkins
            .extend_guarded(checkin_id, checkin.checkout_time, new_checkout_time)
            .await?;
        if !applied {
            // Re-read to tell "closed under us" from "extended under us".
            let current = self.get_required(checkin_id).await?;
            return if current.is_in_house() {
                Err(AppError::conflict(
                    "Checkin was extended concurrently; retry with fresh state",
                ))
            } else {
                Err(AppError::checkin_not_active(format!(
                    "Checkin {checkin_id} is already closed"
                )))
            };
        }

        let extension = self
            .checkins
            .insert_extension(CreateCheckinExtension {
                checkin_id,
                additional_hours: request.additional_hours,
                new_checkout_time,
                payment_method: request.payment_method,
                payment_amount: request.payment_amount,
                notes: request.notes,
                created_by: user_id,
            })
            .await?;

        audit::emit(
            self.audit.as_ref(),
            AuditEvent::checkin_transition(
                actor,
                checkin.unit_id,
                checkin_id,
                Some(checkin.status),
                CheckinStatus::Extended,
                self.clock.now(),
            ),
        )
        .await;

        Ok(extension)
    }

    /// Close an in-house checkin before its checkout time (user action).
    ///
    /// On success the unit moves `Occupied -> Cleaning` and the cleaning
    /// timer starts.
    pub async fn early_checkout(&self, checkin_id: Uuid, user_id: Uuid) -> AppResult<Checkin> {
        let actor = Actor::User(user_id);
        let checkin = self.get_required(checkin_id).await?;
        if !checkin.is_in_house() {
            return Err(AppError::checkin_not_active(format!(
                "Checkin {checkin_id} is already closed"
            )));
        }

        let won = self
            .checkins
            .complete_guarded(checkin_id, CheckinStatus::EarlyCheckout)
            .await?;
        if !won {
            return Err(AppError::checkin_not_active(format!(
                "Checkin {checkin_id} was closed concurrently"
            )));
        }

        audit::emit(
            self.audit.as_ref(),
            AuditEvent::checkin_transition(
                actor,
                checkin.unit_id,
                checkin_id,
                Some(checkin.status),
                CheckinStatus::EarlyCheckout,
                self.clock.now(),
            ),
        )
        .await;

        self.start_cleaning_after_checkout(checkin.unit_id, actor).await;

        self.get_required(checkin_id).await
    }

    /// Close a due checkin on behalf of the scheduler.
    ///
    /// Returns whether this call performed the transition. A guard miss
    /// (already closed by a concurrent early checkout, pushed out of
    /// due-ness by a concurrent extension, or handled by a previous tick)
    /// and a not-yet-due checkout time are both `Ok(false)` — the
    /// condition is already satisfied or not yet applicable, never an
    /// error.
    pub async fn auto_checkout(&self, checkin: &Checkin) -> AppResult<bool> {
        let now = self.clock.now();
        if !checkin.is_in_house() || !checkin.is_due(now) {
            return Ok(false);
        }

        // Due-ness is re-checked inside the guard: `checkin` may be a
        // stale listing snapshot whose checkout_time has since moved.
        let won = self
            .checkins
            .complete_due_guarded(checkin.id, CheckinStatus::Completed, now)
            .await?;
        if !won {
            return Ok(false);
        }

        audit::emit(
            self.audit.as_ref(),
            AuditEvent::checkin_transition(
                Actor::Scheduler,
                checkin.unit_id,
                checkin.id,
                Some(checkin.status),
                CheckinStatus::Completed,
                self.clock.now(),
            ),
        )
        .await;

        self.start_cleaning_after_checkout(checkin.unit_id, Actor::Scheduler)
            .await;

        Ok(true)
    }

    /// List the extension history for a checkin, oldest first.
    pub async fn extension_history(&self, checkin_id: Uuid) -> AppResult<Vec<CheckinExtension>> {
        self.get_required(checkin_id).await?;
        self.checkins.list_extensions(checkin_id).await
    }

    /// Fetch a checkin or fail with `NotFound`.
    async fn get_required(&self, checkin_id: Uuid) -> AppResult<Checkin> {
        self.checkins
            .get_checkin(checkin_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Checkin {checkin_id} not found")))
    }

    /// Move the unit `Occupied -> Cleaning` after a checkout committed.
    ///
    /// A guard miss or store error here is logged, not propagated: the
    /// checkin transition is already durable and the reconciliation sweep
    /// repairs the unit if this write was lost.
    async fn start_cleaning_after_checkout(&self, unit_id: Uuid, actor: Actor) {
        match self.projector.release_to_cleaning(unit_id, actor).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(
                    %unit_id,
                    "Unit was not occupied when starting post-checkout cleaning"
                );
            }
            Err(e) => {
                tracing::warn!(
                    %unit_id,
                    "Failed to start post-checkout cleaning (left for reconciliation): {}",
                    e
                );
            }
        }
    }
}
