//! Actor attribution for audited transitions.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who caused a state transition.
///
/// Automatic transitions are attributed to the background process that
/// performed them rather than to a sentinel user id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Actor {
    /// An interactive user (admin or field team member).
    User(Uuid),
    /// The recurring lifecycle scheduler.
    Scheduler,
    /// The reconciliation repair job.
    ReconciliationJob,
}

impl Actor {
    /// Whether this actor is a background process rather than a person.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::Scheduler | Self::ReconciliationJob)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User(id) => write!(f, "user:{id}"),
            Self::Scheduler => write!(f, "scheduler"),
            Self::ReconciliationJob => write!(f, "reconciliation"),
        }
    }
}
