//! Reconciliation sweep: detects and repairs drift between a unit's
//! cached status and the authoritative checkin history.

pub mod report;
pub mod service;

pub use report::{SweepReport, UnitRepair};
pub use service::ReconciliationService;
