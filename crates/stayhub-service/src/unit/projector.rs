//! The single writer of `Unit.status`.
//!
//! Every caller — interactive requests, the scheduler, the reconciliation
//! job — changes unit status through this projector. Each transition is a
//! compare-and-set on the expected pre-state; a guard miss means another
//! actor got there first and is reported as `Ok(false)`.

use std::sync::Arc;

use uuid::Uuid;

use stayhub_core::clock::Clock;
use stayhub_core::error::AppError;
use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_entity::unit::{UnitStatus, UnitStatusChange};

use crate::audit::{self, AuditEvent, AuditSink};
use crate::store::UnitStore;

/// Guarded unit-status writer.
#[derive(Debug, Clone)]
pub struct UnitStatusProjector {
    units: Arc<dyn UnitStore>,
    clock: Arc<dyn Clock>,
    audit: Arc<dyn AuditSink>,
}

impl UnitStatusProjector {
    /// Create a new projector.
    pub fn new(units: Arc<dyn UnitStore>, clock: Arc<dyn Clock>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            units,
            clock,
            audit,
        }
    }

    /// Apply `from -> to` only if the persisted status equals `from`.
    ///
    /// `Maintenance` can be neither the guard nor the target: it is
    /// entered and left exclusively by operator action outside this
    /// engine. Returns whether the write took effect and emits one audit
    /// event when it did.
    pub async fn set_status(
        &self,
        unit_id: Uuid,
        from: UnitStatus,
        to: UnitStatus,
        actor: Actor,
    ) -> AppResult<bool> {
        if !from.is_automatable() || !to.is_automatable() {
            return Err(AppError::validation(
                "maintenance status is operator-only and cannot be set by the engine",
            ));
        }

        let now = self.clock.now();
        let change = match to {
            UnitStatus::Occupied => UnitStatusChange::occupied(),
            UnitStatus::Cleaning => UnitStatusChange::cleaning(now),
            UnitStatus::Available => UnitStatusChange::available(),
            UnitStatus::Maintenance => unreachable!("rejected above"),
        };

        let applied = self.units.update_status_guarded(unit_id, from, change).await?;

        if applied {
            tracing::debug!(%unit_id, %actor, from = %from, to = %to, "unit status transition");
            audit::emit(
                self.audit.as_ref(),
                AuditEvent::unit_transition(actor, unit_id, from, to, now),
            )
            .await;
        }

        Ok(applied)
    }

    /// `Available -> Occupied`, the checkin-creation transition.
    pub async fn occupy(&self, unit_id: Uuid, actor: Actor) -> AppResult<bool> {
        self.set_status(unit_id, UnitStatus::Available, UnitStatus::Occupied, actor)
            .await
    }

    /// `Occupied -> Cleaning`, starting the cleaning timer at now.
    pub async fn release_to_cleaning(&self, unit_id: Uuid, actor: Actor) -> AppResult<bool> {
        self.set_status(unit_id, UnitStatus::Occupied, UnitStatus::Cleaning, actor)
            .await
    }

    /// `Cleaning -> Available`, clearing the cleaning timer.
    pub async fn finish_cleaning(&self, unit_id: Uuid, actor: Actor) -> AppResult<bool> {
        self.set_status(unit_id, UnitStatus::Cleaning, UnitStatus::Available, actor)
            .await
    }

    /// `Occupied -> Available`, the rollback path for a checkin creation
    /// whose durable insert failed after the unit was already occupied.
    pub async fn release_occupancy(&self, unit_id: Uuid, actor: Actor) -> AppResult<bool> {
        self.set_status(unit_id, UnitStatus::Occupied, UnitStatus::Available, actor)
            .await
    }
}
