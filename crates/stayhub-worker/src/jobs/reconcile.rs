//! Reconciliation tick handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use stayhub_core::result::AppResult;
use stayhub_service::ReconciliationService;

use crate::jobs::TickHandler;

/// Runs the drift-repair sweep on its own, slower cadence.
#[derive(Debug)]
pub struct ReconciliationHandler {
    service: Arc<ReconciliationService>,
}

impl ReconciliationHandler {
    /// Create a new reconciliation handler.
    pub fn new(service: Arc<ReconciliationService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl TickHandler for ReconciliationHandler {
    fn name(&self) -> &str {
        "reconciliation"
    }

    async fn run(&self) -> AppResult<Value> {
        let report = self.service.run_sweep().await?;

        Ok(serde_json::json!({
            "task": "reconciliation",
            "scanned": report.scanned,
            "orphaned_occupied_repaired": report.orphaned_occupied_repaired,
            "stuck_cleaning_repaired": report.stuck_cleaning_repaired,
            "skipped": report.skipped,
        }))
    }
}
