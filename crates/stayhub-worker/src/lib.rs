//! Scheduled background jobs for StayHub.
//!
//! This crate provides:
//! - A cron scheduler that fires the periodic lifecycle tick and the
//!   reconciliation sweep
//! - Tick handler implementations for auto-checkout, cleaning-cycle
//!   completion, and drift reconciliation
//!
//! Every handler is a full-scan pass over current state rather than a
//! queue consumer: a missed or delayed tick loses nothing, because the
//! next tick sees the same rows and the guarded writes make re-processing
//! harmless.

pub mod jobs;
pub mod scheduler;

pub use jobs::{AutoCheckoutHandler, CleaningCompletionHandler, ReconciliationHandler};
pub use scheduler::CronScheduler;
