//! Auto-checkout tick handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use stayhub_core::clock::Clock;
use stayhub_core::result::AppResult;
use stayhub_service::store::CheckinStore;
use stayhub_service::CheckinService;

use crate::jobs::TickHandler;

/// Closes every in-house checkin whose checkout time has passed.
///
/// A single pass handles the whole backlog, so checkins that came due
/// while the scheduler was down are closed on the first tick after
/// restart.
#[derive(Debug)]
pub struct AutoCheckoutHandler {
    checkins: Arc<dyn CheckinStore>,
    service: Arc<CheckinService>,
    clock: Arc<dyn Clock>,
}

impl AutoCheckoutHandler {
    /// Create a new auto-checkout handler.
    pub fn new(
        checkins: Arc<dyn CheckinStore>,
        service: Arc<CheckinService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            checkins,
            service,
            clock,
        }
    }
}

#[async_trait]
impl TickHandler for AutoCheckoutHandler {
    fn name(&self) -> &str {
        "auto_checkout"
    }

    async fn run(&self) -> AppResult<Value> {
        let now = self.clock.now();
        let due = self.checkins.list_due(now).await?;

        let mut completed = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for checkin in &due {
            match self.service.auto_checkout(checkin).await {
                Ok(true) => completed += 1,
                // Already closed by a concurrent early checkout or an
                // overlapping tick.
                Ok(false) => skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        checkin_id = %checkin.id,
                        unit_id = %checkin.unit_id,
                        "Auto-checkout failed, will retry next tick: {}",
                        e
                    );
                    failed += 1;
                }
            }
        }

        if completed > 0 || failed > 0 {
            tracing::info!(due = due.len(), completed, skipped, failed, "auto-checkout pass done");
        }

        Ok(serde_json::json!({
            "task": "auto_checkout",
            "due": due.len(),
            "completed": completed,
            "skipped": skipped,
            "failed": failed,
        }))
    }
}
