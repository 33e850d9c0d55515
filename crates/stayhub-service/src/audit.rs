//! Audit events for committed transitions.
//!
//! The engine emits one event per committed state change; persisting them
//! (activity log, reporting) is an external collaborator's concern. The
//! default sink just logs through `tracing`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_entity::checkin::CheckinStatus;
use stayhub_entity::unit::UnitStatus;

/// Which entity a transition applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditTarget {
    /// A unit status transition.
    Unit,
    /// A checkin lifecycle transition.
    Checkin,
}

/// One committed transition, attributed to its actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Who caused the transition.
    pub actor: Actor,
    /// The unit involved.
    pub unit_id: Uuid,
    /// The checkin involved, for checkin transitions.
    pub checkin_id: Option<Uuid>,
    /// Which entity changed.
    pub target: AuditTarget,
    /// Status before the transition; `None` for creation.
    pub from_status: Option<String>,
    /// Status after the transition.
    pub to_status: String,
    /// When the transition committed.
    pub occurred_at: DateTime<Utc>,
}

impl AuditEvent {
    /// A committed unit status transition.
    pub fn unit_transition(
        actor: Actor,
        unit_id: Uuid,
        from: UnitStatus,
        to: UnitStatus,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor,
            unit_id,
            checkin_id: None,
            target: AuditTarget::Unit,
            from_status: Some(from.as_str().to_string()),
            to_status: to.as_str().to_string(),
            occurred_at,
        }
    }

    /// A committed checkin lifecycle transition.
    pub fn checkin_transition(
        actor: Actor,
        unit_id: Uuid,
        checkin_id: Uuid,
        from: Option<CheckinStatus>,
        to: CheckinStatus,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor,
            unit_id,
            checkin_id: Some(checkin_id),
            target: AuditTarget::Checkin,
            from_status: from.map(|s| s.as_str().to_string()),
            to_status: to.as_str().to_string(),
            occurred_at,
        }
    }
}

/// Consumer of audit events.
///
/// Sink failures never abort the transition that produced the event; the
/// services log and move on.
#[async_trait]
pub trait AuditSink: Send + Sync + std::fmt::Debug {
    /// Record one committed transition.
    async fn record(&self, event: AuditEvent) -> AppResult<()>;
}

/// Default sink that emits events as structured log lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

#[async_trait]
impl AuditSink for TracingAuditSink {
    async fn record(&self, event: AuditEvent) -> AppResult<()> {
        tracing::info!(
            actor = %event.actor,
            unit_id = %event.unit_id,
            checkin_id = ?event.checkin_id,
            target = ?event.target,
            from = event.from_status.as_deref().unwrap_or("-"),
            to = %event.to_status,
            "audit"
        );
        Ok(())
    }
}

/// Record an event on a sink, logging instead of propagating failures.
pub(crate) async fn emit(sink: &dyn AuditSink, event: AuditEvent) {
    if let Err(e) = sink.record(event).await {
        tracing::warn!("Failed to record audit event: {}", e);
    }
}
