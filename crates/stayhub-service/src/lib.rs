//! # stayhub-service
//!
//! Business logic for the unit/checkin lifecycle engine.
//!
//! The engine assumes multiple non-cooperating writers (interactive
//! requests, the scheduler, the reconciliation job) racing over the same
//! rows with no locks. Safety rests on guarded compare-and-set writes
//! exposed by the [`store`] traits: a write that matches zero rows means
//! "already handled by someone else" and is treated as a no-op, never as
//! an error.

pub mod audit;
pub mod checkin;
pub mod cleaning;
pub mod reconcile;
pub mod store;
pub mod unit;

pub use audit::{AuditEvent, AuditSink, TracingAuditSink};
pub use checkin::CheckinService;
pub use cleaning::CleaningService;
pub use reconcile::ReconciliationService;
pub use store::{CheckinStore, UnitStore};
pub use unit::UnitStatusProjector;
