//! Built-in tick handler implementations.

use async_trait::async_trait;
use serde_json::Value;

use stayhub_core::result::AppResult;

pub mod checkout;
pub mod cleaning;
pub mod reconcile;

pub use checkout::AutoCheckoutHandler;
pub use cleaning::CleaningCompletionHandler;
pub use reconcile::ReconciliationHandler;

/// A unit of scheduled work fired by the cron scheduler.
///
/// Handlers must be idempotent: the scheduler offers no exactly-once
/// guarantee, and overlapping runs against the same rows are resolved by
/// the guarded writes underneath, not by the handler.
#[async_trait]
pub trait TickHandler: Send + Sync + std::fmt::Debug {
    /// Stable name used in schedule registration and logging.
    fn name(&self) -> &str;

    /// Run one pass, returning a JSON summary of what was done.
    async fn run(&self) -> AppResult<Value>;
}
