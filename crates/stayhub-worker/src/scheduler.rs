//! Cron scheduler for periodic lifecycle work.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tracing;

use stayhub_core::config::scheduler::SchedulerConfig;
use stayhub_core::error::AppError;

use crate::jobs::TickHandler;

/// Cron-based scheduler driving the periodic tick handlers.
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Scheduler settings
    config: SchedulerConfig,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler")
            .field("config", &self.config)
            .finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler.
    pub async fn new(config: SchedulerConfig) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self { scheduler, config })
    }

    /// Register the standard tick handlers at their configured cadences.
    ///
    /// Auto-checkout and cleaning completion share the fast lifecycle
    /// interval; reconciliation runs on its own slower one.
    pub async fn register_default_tasks(
        &self,
        checkout: Arc<dyn TickHandler>,
        cleaning: Arc<dyn TickHandler>,
        reconciliation: Arc<dyn TickHandler>,
    ) -> Result<(), AppError> {
        let tick = self.config.tick_interval_minutes;
        let sweep = self.config.reconciliation_interval_minutes;

        self.register_handler(checkout, tick).await?;
        self.register_handler(cleaning, tick).await?;
        self.register_handler(reconciliation, sweep).await?;

        tracing::info!(
            tick_interval_minutes = tick,
            reconciliation_interval_minutes = sweep,
            "All scheduled tasks registered"
        );
        Ok(())
    }

    /// Register a single handler to run every `interval_minutes`.
    pub async fn register_handler(
        &self,
        handler: Arc<dyn TickHandler>,
        interval_minutes: u32,
    ) -> Result<(), AppError> {
        let name = handler.name().to_string();
        let schedule = minute_schedule(&name, interval_minutes);

        let job_name = name.clone();
        let job = CronJob::new_async(schedule.as_str(), move |_uuid, _lock| {
            let handler = Arc::clone(&handler);
            let name = job_name.clone();
            Box::pin(async move {
                tracing::debug!(task = %name, "tick fired");
                match handler.run().await {
                    Ok(summary) => {
                        tracing::debug!(task = %name, %summary, "tick completed");
                    }
                    Err(e) => {
                        tracing::error!(task = %name, "tick failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create {} schedule: {}", name, e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {} schedule: {}", name, e)))?;

        tracing::info!("Registered: {} (every {}min)", name, interval_minutes);
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.scheduler
            .clone()
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}

/// Build a six-field cron expression firing every `interval_minutes`.
///
/// Intervals under an hour must divide 60 for the wall-clock expression
/// to fire evenly; anything that doesn't fit is clamped to hourly with a
/// warning rather than rejected.
fn minute_schedule(name: &str, interval_minutes: u32) -> String {
    match interval_minutes {
        0 | 1 => "0 * * * * *".to_string(),
        m if m < 60 && 60 % m == 0 => format!("0 */{} * * * *", m),
        m if m % 60 == 0 => {
            let hours = m / 60;
            if hours == 1 {
                "0 0 * * * *".to_string()
            } else {
                format!("0 0 */{} * * *", hours)
            }
        }
        m => {
            tracing::warn!(
                task = %name,
                interval_minutes = m,
                "interval does not fit a cron expression, clamping to hourly"
            );
            "0 0 * * * *".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sub_hour_divisor_intervals() {
        assert_eq!(minute_schedule("t", 5), "0 */5 * * * *");
        assert_eq!(minute_schedule("t", 15), "0 */15 * * * *");
        assert_eq!(minute_schedule("t", 1), "0 * * * * *");
    }

    #[test]
    fn hourly_and_slower_intervals() {
        assert_eq!(minute_schedule("t", 60), "0 0 * * * *");
        assert_eq!(minute_schedule("t", 180), "0 0 */3 * * *");
    }

    #[test]
    fn awkward_interval_clamps_to_hourly() {
        assert_eq!(minute_schedule("t", 7), "0 0 * * * *");
    }
}
