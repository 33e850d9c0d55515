//! Cleaning-completion tick handler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use stayhub_core::clock::Clock;
use stayhub_core::config::cleaning::CleaningConfig;
use stayhub_core::result::AppResult;
use stayhub_entity::actor::Actor;
use stayhub_service::store::UnitStore;
use stayhub_service::UnitStatusProjector;

use crate::jobs::TickHandler;

/// Returns cleaning units to `Available` once their budget has elapsed.
///
/// The budget is the base duration plus whatever extension staff granted
/// during the cycle; the check is done against the stored
/// `cleaning_started_at`, so the handler itself holds no timer state.
#[derive(Debug)]
pub struct CleaningCompletionHandler {
    units: Arc<dyn UnitStore>,
    projector: Arc<UnitStatusProjector>,
    config: CleaningConfig,
    clock: Arc<dyn Clock>,
}

impl CleaningCompletionHandler {
    /// Create a new cleaning-completion handler.
    pub fn new(
        units: Arc<dyn UnitStore>,
        projector: Arc<UnitStatusProjector>,
        config: CleaningConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            units,
            projector,
            config,
            clock,
        }
    }
}

#[async_trait]
impl TickHandler for CleaningCompletionHandler {
    fn name(&self) -> &str {
        "cleaning_completion"
    }

    async fn run(&self) -> AppResult<Value> {
        let now = self.clock.now();
        let cleaning = self.units.list_cleaning_units().await?;

        let mut finished = 0usize;
        let mut skipped = 0usize;
        let mut failed = 0usize;

        for unit in &cleaning {
            if !unit.cleaning_elapsed(self.config.base_duration_minutes, now) {
                continue;
            }

            match self.projector.finish_cleaning(unit.id, Actor::Scheduler).await {
                Ok(true) => finished += 1,
                // Staff finished it manually between our read and the write.
                Ok(false) => skipped += 1,
                Err(e) => {
                    tracing::warn!(
                        unit_id = %unit.id,
                        "Failed to finish cleaning, will retry next tick: {}",
                        e
                    );
                    failed += 1;
                }
            }
        }

        if finished > 0 || failed > 0 {
            tracing::info!(
                in_cleaning = cleaning.len(),
                finished,
                skipped,
                failed,
                "cleaning-completion pass done"
            );
        }

        Ok(serde_json::json!({
            "task": "cleaning_completion",
            "in_cleaning": cleaning.len(),
            "finished": finished,
            "skipped": skipped,
            "failed": failed,
        }))
    }
}
